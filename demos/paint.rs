use std::path::Path;

use quadmask::parse::read_tree_file;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .map(Path::new)
        .expect("A .json tree file is required");

    let tree = read_tree_file(path).expect("Failed to load tree file");

    println!("{}", tree.paint());
    println!("depth: {}", tree.depth());
}
