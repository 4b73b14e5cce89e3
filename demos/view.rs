use std::io;
use std::path::Path;

use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::style;
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use quadmask::ScreenSize;
use quadmask::camera::Camera;
use quadmask::camera::draw_tree;
use quadmask::events::Event;
use quadmask::events::convert_event;
use quadmask::parse::read_tree_file;
use quadmask::tree::Child;

/// Largest power of two no greater than `n`
fn floor_pow2(n: usize) -> usize {
    if n.is_power_of_two() {
        n
    } else {
        n.next_power_of_two() / 2
    }
}

/// Each braille character packs a 2x4 pixel block. The last terminal row is
/// left free for the cursor.
fn camera_for(cols: ScreenSize, rows: ScreenSize) -> Camera {
    let w = cols as usize * 2;
    let h = rows.saturating_sub(1) as usize * 4;

    Camera::new(w.max(2), h.max(4))
}

fn draw(cam: &mut Camera, tree: &Child) {
    cam.reset();
    cam.draw_outline();

    let side = cam.width().min(cam.height());
    let size = floor_pow2(side.saturating_sub(2));

    draw_tree(cam, tree, 1, 1, size);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .map(Path::new)
        .expect("A .json tree file is required");

    let tree = read_tree_file(path)?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();

    let (cols, rows) = terminal::size()?;
    let mut cam = camera_for(cols, rows);

    loop {
        draw(&mut cam, &tree);
        let s = cam.render();

        execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        for line in s.lines() {
            execute!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        // The tree is static, so only redraw when an event calls for it
        let event = event::read()?;

        match convert_event(event) {
            Some(Event::Exit) => break,
            Some(Event::Resize { cols, rows }) => {
                cam = camera_for(cols, rows);
            }
            None => {}
        }
    }

    terminal::disable_raw_mode()?;

    Ok(())
}
