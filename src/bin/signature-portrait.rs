use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use signature_portrait::{
    circle::DEFAULT_DIAMETER, default_output_path, gradient::DEFAULT_BRIGHTNESS_THRESHOLD,
    CircleOptions, GradientOptions, ProcessResult, SignatureEngine,
};

#[derive(Parser)]
#[command(
    name = "signature-portrait",
    about = "Render profile photos into email-signature portraits",
    version,
    after_help = "Simple usage: signature-portrait circle <photo>  (writes <photo>_signature.png)\n\n\
                  NOTE: Background removal is a brightness heuristic for flat, light backdrops.\n\
                  It will also fade very light clothing or skin."
)]
struct Cli {
    #[command(subcommand)]
    layout: LayoutCommand,

    #[command(flatten)]
    common: Common,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct Common {
    /// Output file or directory (default: {name}_signature.png)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Print the portrait as a data URL on stdout instead of writing a file
    #[arg(long, global = true)]
    data_url: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum LayoutCommand {
    /// Round portrait clipped to a circle
    Circle {
        /// Input image file or directory
        input: String,

        /// Diameter of the circle in pixels
        #[arg(short, long, default_value_t = DEFAULT_DIAMETER)]
        diameter: u32,

        /// Keep the photo in color
        #[arg(long)]
        no_grayscale: bool,

        /// Desaturation strength (0-100)
        #[arg(short, long, default_value_t = 100)]
        grayscale_amount: u8,
    },
    /// Portrait composited onto a brand gradient (160x175)
    Gradient {
        /// Input image file or directory
        input: String,

        /// Gradient asset image
        #[arg(short, long)]
        gradient: String,

        /// Keep the photo's backdrop instead of fading it out
        #[arg(long)]
        keep_background: bool,

        /// Brightness above which a pixel counts as backdrop (0-255)
        #[arg(short, long, default_value_t = DEFAULT_BRIGHTNESS_THRESHOLD)]
        threshold: u8,
    },
}

fn main() {
    let cli = Cli::parse();
    let opts = &cli.common;

    if opts.verbose && opts.quiet {
        eprintln!("Error: Cannot specify both --verbose and --quiet");
        process::exit(1);
    }

    let default_level = if opts.verbose {
        "debug"
    } else if opts.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let (input, engine) = match &cli.layout {
        LayoutCommand::Circle {
            input,
            diameter,
            no_grayscale,
            grayscale_amount,
        } => {
            if *diameter == 0 {
                eprintln!("Error: Diameter must be greater than 0");
                process::exit(1);
            }
            if *grayscale_amount > 100 {
                eprintln!("Error: Grayscale amount must be between 0 and 100");
                process::exit(1);
            }
            let engine = SignatureEngine::circle(CircleOptions {
                diameter: *diameter,
                grayscale: !no_grayscale,
                grayscale_amount: *grayscale_amount,
            });
            (input, engine)
        }
        LayoutCommand::Gradient {
            input,
            gradient,
            keep_background,
            threshold,
        } => {
            let options = GradientOptions {
                remove_background: !keep_background,
                brightness_threshold: *threshold,
            };
            let engine = match std::fs::read(gradient)
                .map_err(signature_portrait::Error::from)
                .and_then(|bytes| SignatureEngine::gradient(&bytes, options))
            {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("Fatal: Failed to load gradient {gradient}: {e}");
                    process::exit(1);
                }
            };
            (input, engine)
        }
    };

    let input_path = Path::new(input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {input}");
        process::exit(1);
    }

    if opts.data_url {
        if input_path.is_dir() {
            eprintln!("Error: --data-url only works with a single input file");
            process::exit(1);
        }
        match std::fs::read(input_path)
            .map_err(signature_portrait::Error::from)
            .and_then(|bytes| engine.render_bytes(&bytes))
        {
            Ok(encoded) => println!("{}", encoded.to_data_url()),
            Err(e) => {
                eprintln!("[FAIL] {input}: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &opts.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: signature-portrait <layout> <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir)
    } else {
        let output_path = match &opts.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Rendered: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &Common) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        match &result.output {
            Some(out) => eprintln!("[OK] {filename} -> {}", out.display()),
            None => eprintln!("[OK] {filename}"),
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
