use image::{Rgba, RgbaImage};
use signature_portrait::gradient::{OUTPUT_HEIGHT, OUTPUT_WIDTH};
use signature_portrait::{
    composite_on_gradient, mask_to_circle, CircleOptions, GradientOptions, RasterImage,
    SignatureEngine,
};

const GRADIENT_BLUE: Rgba<u8> = Rgba([0, 60, 200, 255]);

fn solid(w: u32, h: u32, px: Rgba<u8>) -> RasterImage {
    RasterImage::from(RgbaImage::from_pixel(w, h, px))
}

/// A photo-like source: a horizontal color ramp with a vertical brightness ramp.
fn ramp(w: u32, h: u32) -> RasterImage {
    RasterImage::from(RgbaImage::from_fn(w, h, |x, y| {
        let r = u8::try_from(x * 255 / w.max(1)).unwrap();
        let g = u8::try_from(y * 255 / h.max(1)).unwrap();
        Rgba([r, g, 128, 255])
    }))
}

fn decode(png: &signature_portrait::EncodedImage) -> RgbaImage {
    png.decode().unwrap().pixels().clone()
}

#[test]
fn circle_from_square_photo_is_exact_gray_disk() {
    let photo = ramp(500, 500);
    let opts = CircleOptions {
        diameter: 121,
        grayscale: true,
        grayscale_amount: 100,
    };
    let out = decode(&mask_to_circle(&photo, &opts).unwrap());
    assert_eq!(out.dimensions(), (121, 121));

    for (x, y, px) in out.enumerate_pixels() {
        let dx = f64::from(x) + 0.5 - 60.5;
        let dy = f64::from(y) + 0.5 - 60.5;
        let inside = dx * dx + dy * dy <= 60.5 * 60.5;
        if inside {
            assert_eq!(px[3], 255, "pixel ({x},{y}) inside disk should be opaque");
            assert_eq!(px[0], px[1], "pixel ({x},{y}) not gray");
            assert_eq!(px[1], px[2], "pixel ({x},{y}) not gray");
        } else {
            assert_eq!(px[3], 0, "pixel ({x},{y}) outside disk should be transparent");
        }
    }
}

#[test]
fn circle_output_size_ignores_source_aspect() {
    for (w, h) in [(2000, 3000), (50, 50), (3000, 20), (1, 1)] {
        let out = decode(&mask_to_circle(&ramp(w, h), &CircleOptions::default()).unwrap());
        assert_eq!(out.dimensions(), (121, 121), "source {w}x{h}");
    }
}

#[test]
fn circle_without_grayscale_keeps_cover_fitted_colors() {
    let photo = solid(200, 100, Rgba([200, 40, 90, 255]));
    let colored = CircleOptions {
        grayscale: false,
        ..CircleOptions::default()
    };
    let out = decode(&mask_to_circle(&photo, &colored).unwrap());
    assert_eq!(*out.get_pixel(60, 60), Rgba([200, 40, 90, 255]));
    assert_eq!(*out.get_pixel(2, 60), Rgba([200, 40, 90, 255]));
    assert_eq!(out.get_pixel(2, 2)[3], 0);
}

#[test]
fn partial_grayscale_sits_between_color_and_gray() {
    let photo = solid(64, 64, Rgba([200, 40, 90, 255]));
    let render = |amount| {
        let opts = CircleOptions {
            grayscale_amount: amount,
            ..CircleOptions::default()
        };
        *decode(&mask_to_circle(&photo, &opts).unwrap()).get_pixel(60, 60)
    };
    let (none, half, full) = (render(0), render(50), render(100));
    assert_eq!(none, Rgba([200, 40, 90, 255]));
    assert_eq!(full[0], full[1]);
    for ch in 0..3 {
        let lo = none[ch].min(full[ch]);
        let hi = none[ch].max(full[ch]);
        assert!((lo..=hi).contains(&half[ch]), "channel {ch}: {half:?}");
        let midpoint = (i32::from(none[ch]) + i32::from(full[ch])) / 2;
        assert!((i32::from(half[ch]) - midpoint).abs() <= 1, "channel {ch}: {half:?}");
    }
}

#[test]
fn gradient_output_is_fixed_size_for_any_photo() {
    let gradient = solid(139, 175, GRADIENT_BLUE);
    for (w, h) in [(2000, 3000), (50, 50), (640, 480)] {
        let png =
            composite_on_gradient(&gradient, &ramp(w, h), &GradientOptions::default()).unwrap();
        let out = decode(&png);
        assert_eq!(
            out.dimensions(),
            (OUTPUT_WIDTH, OUTPUT_HEIGHT),
            "source {w}x{h}"
        );
    }
}

#[test]
fn portrait_photo_lands_in_profile_window() {
    let gradient = solid(139, 175, GRADIENT_BLUE);
    let photo = ramp(300, 400);
    let opts = GradientOptions {
        remove_background: false,
        ..GradientOptions::default()
    };
    let out = decode(&composite_on_gradient(&gradient, &photo, &opts).unwrap());
    assert_eq!(out.dimensions(), (160, 175));

    let window_top = 175 - 148;
    for (x, y, px) in out.enumerate_pixels() {
        let in_window = (13..155).contains(&x) && y >= window_top;
        let in_gradient = x < 139;
        if in_window {
            assert_eq!(px[3], 255, "({x},{y})");
            assert_eq!(px[2], 128, "({x},{y}) should show the photo");
        } else if in_gradient {
            assert_eq!(*px, GRADIENT_BLUE, "({x},{y}) should show the gradient");
        } else {
            assert_eq!(px[3], 0, "({x},{y}) should be transparent");
        }
    }

    // Cover-fit of 300x400 into 142x148 crops top and bottom, keeping the
    // full width: the left column is near-black red, the right near-full red.
    assert!(out.get_pixel(13, 100)[0] < 5);
    assert!(out.get_pixel(154, 100)[0] > 250);
}

#[test]
fn white_backdrop_reveals_gradient() {
    let gradient = solid(139, 175, GRADIENT_BLUE);
    let photo = solid(300, 400, Rgba([255, 255, 255, 255]));
    let out = decode(
        &composite_on_gradient(&gradient, &photo, &GradientOptions::default()).unwrap(),
    );
    assert_eq!(*out.get_pixel(80, 120), GRADIENT_BLUE);
    assert_eq!(out.get_pixel(150, 120)[3], 0);
}

#[test]
fn engine_renders_file_and_directory() {
    let dir = std::env::temp_dir().join(format!("signature-portrait-it-{}", std::process::id()));
    let input_dir = dir.join("in");
    let output_dir = dir.join("out");
    std::fs::create_dir_all(&input_dir).unwrap();

    RgbaImage::from_pixel(40, 60, Rgba([30, 90, 150, 255]))
        .save(input_dir.join("alice.png"))
        .unwrap();
    RgbaImage::from_pixel(90, 30, Rgba([200, 90, 10, 255]))
        .save(input_dir.join("bob.bmp"))
        .unwrap();
    std::fs::write(input_dir.join("notes.txt"), "not an image").unwrap();
    std::fs::write(input_dir.join("broken.jpg"), "not a jpeg").unwrap();

    let engine = SignatureEngine::circle(CircleOptions::default());
    let mut results = engine.process_directory(&input_dir, &output_dir);
    results.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(results.len(), 3);
    let ok: Vec<_> = results.iter().filter(|r| r.success).collect();
    assert_eq!(ok.len(), 2);
    assert!(results
        .iter()
        .any(|r| !r.success && r.path.ends_with("broken.jpg")));

    let alice = image::open(output_dir.join("alice_signature.png")).unwrap();
    assert_eq!((alice.width(), alice.height()), (121, 121));
    assert!(output_dir.join("bob_signature.png").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
