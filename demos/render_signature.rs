//! Render both signature portraits for one photo.
//!
//! Usage:
//! ```sh
//! cargo run --example render_signature -- photo.jpg gradient.png out_dir
//! ```

use std::env;
use std::path::Path;
use std::process;

use signature_portrait::{CircleOptions, GradientOptions, RasterImage, SignatureEngine};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <photo> <gradient> <out_dir>", args[0]);
        process::exit(1);
    }

    let photo = std::fs::read(&args[1]).expect("failed to read photo");
    let gradient = std::fs::read(&args[2]).expect("failed to read gradient");
    let out_dir = Path::new(&args[3]);
    std::fs::create_dir_all(out_dir).expect("failed to create output directory");

    let profile = RasterImage::decode(&photo).expect("photo is not a readable image");

    let round = SignatureEngine::circle(CircleOptions::default());
    let branded = SignatureEngine::gradient(&gradient, GradientOptions::default())
        .expect("gradient is not a readable image");

    for (name, engine) in [("circle.png", &round), ("gradient.png", &branded)] {
        let png = engine.render(&profile).expect("render failed");
        let path = out_dir.join(name);
        signature_portrait::save_image(&png, &path).expect("failed to save");
        let (w, h) = engine.output_size();
        println!("{} ({w}x{h}, {} bytes)", path.display(), png.bytes().len());
    }
}
