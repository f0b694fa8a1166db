//! jpegrow CLI - inspect and decode JPEG images with the incremental reader.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use jpegrow_rs::{
    BoundingBox, DecoderConfig, DecompressionOptions, FileReader, ImageBuffer, JpegColorSpace, JpegReader,
    MessageLog, PixelBuffer, read_jpeg_header,
};

/// Incremental JPEG reader
#[derive(Parser)]
#[command(name = "jpegrow")]
#[command(version)]
#[command(about = "Inspect and decode baseline JPEG images scanline by scanline", long_about = None)]
#[command(after_help = "EXAMPLES:
    jpegrow info -i image.jpg
    jpegrow info -i image.jpg --extended --color-space rgba
    jpegrow decode -i image.jpg -o image.ppm -f ppm --color-space rgb
    jpegrow decode -i image.jpg -o tile.raw --region 64,64,128,128

Set RUST_LOG=debug for decoder traces.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the image header
    #[command(visible_alias = "i")]
    Info {
        #[arg(short, long, help = "Path to the JPEG file to inspect")]
        input: PathBuf,

        /// Also negotiate and show the output image for the given options
        #[arg(short, long)]
        extended: bool,

        /// Output colour space used with --extended
        #[arg(short, long, default_value = "auto")]
        color_space: JpegColorSpace,

        /// Region used with --extended, as x,y,width,height
        #[arg(short, long, value_parser = parse_region)]
        region: Option<BoundingBox>,
    },

    /// Decode an image to raw pixels or PPM/PGM
    #[command(visible_alias = "d")]
    Decode {
        #[arg(short, long, help = "Path to the JPEG file")]
        input: PathBuf,

        #[arg(short, long, help = "Path for the output file")]
        output: PathBuf,

        /// Output colour space (auto keeps the image's own)
        #[arg(short, long, default_value = "auto")]
        color_space: JpegColorSpace,

        /// Decode only this region, as x,y,width,height
        #[arg(short, long, value_parser = parse_region)]
        region: Option<BoundingBox>,

        /// Ignore --region and decode the full image
        #[arg(long)]
        no_partial: bool,

        /// Output format: raw (binary pixels) or ppm (Portable PixMap)
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,
    },

    /// List the supported output colour conversions
    #[command(visible_alias = "l")]
    List,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw binary pixel data
    Raw,
    /// Portable PixMap (PGM for grayscale, PPM for RGB)
    Ppm,
}

fn parse_region(value: &str) -> Result<BoundingBox, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("invalid region '{}': {}", value, e)))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x0, y0, width, height] => Ok(BoundingBox::new(x0, y0, width, height)),
        _ => Err(format!("region '{}' must be x,y,width,height", value)),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Info {
            input,
            extended,
            color_space,
            region,
        } => show_info(&input, extended, DecompressionOptions::new(color_space, region)),
        Commands::Decode {
            input,
            output,
            color_space,
            region,
            no_partial,
            format,
        } => decode_image(
            &input,
            &output,
            DecompressionOptions::new(color_space, region),
            DecoderConfig {
                partial_decoding: !no_partial,
                ..DecoderConfig::default()
            },
            &format,
        ),
        Commands::List => list_conversions(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_messages(log: &MessageLog) {
    for message in log {
        eprintln!("{}", message);
    }
}

fn show_info(input: &Path, extended: bool, options: DecompressionOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = FileReader::open(input)?;
    let mut messages = MessageLog::new();
    let header = read_jpeg_header(&mut source, true, Some(&mut messages));
    print_messages(&messages);
    if !header.is_valid() {
        return Err(format!("cannot read JPEG header of {:?}", input).into());
    }

    println!("File: {:?}", input);
    println!("  Dimensions:  {}x{}", header.width, header.height);
    println!("  Components:  {}", header.nr_channels);
    println!("  Color space: {}", header.color_space);

    if extended {
        let mut reader = JpegReader::with_source(&mut source, options);
        let output = reader.get_output_image_info();
        print_messages(reader.message_log());
        if !output.is_valid() {
            return Err(format!("cannot decode {:?} as {}", input, options.out_color_space).into());
        }
        println!("Output:");
        println!("  Dimensions:  {}x{}", output.width, output.height);
        println!("  Channels:    {}", output.nr_channels);
        println!("  Color space: {}", output.color_space);
        println!("  Bytes:       {}", output.required_bytes());
    }
    Ok(())
}

fn decode_image(
    input: &Path,
    output: &Path,
    options: DecompressionOptions,
    config: DecoderConfig,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = FileReader::open(input)?;
    let mut reader = JpegReader::with_config(config);
    reader.set_decompression_options(options);
    reader.set_source(&mut source);

    let image = reader.read_image_data();
    print_messages(reader.message_log());
    if !image.is_valid() {
        return Err(format!("failed to decode {:?}", input).into());
    }

    match format {
        OutputFormat::Raw => fs::write(output, image.data())?,
        OutputFormat::Ppm => write_ppm(output, &image)?,
    }
    println!(
        "✓ Decoded {}x{} image ({} channels) to {:?}",
        image.width(),
        image.height(),
        image.nr_channels(),
        output
    );
    Ok(())
}

fn list_conversions() -> Result<(), Box<dyn std::error::Error>> {
    println!("Supported colour conversions:");
    println!();
    let stream_spaces = [
        JpegColorSpace::Grayscale,
        JpegColorSpace::YCbCr,
        JpegColorSpace::Rgb,
        JpegColorSpace::Cmyk,
        JpegColorSpace::Ycck,
    ];
    for native in stream_spaces {
        let targets: Vec<&str> = JpegColorSpace::ALL
            .iter()
            .filter(|&&target| target != JpegColorSpace::Unknown && target != JpegColorSpace::Auto)
            .filter(|&&target| native.can_convert_to(target))
            .map(|target| target.name())
            .collect();
        println!("  {:<10} -> {}", native.name(), targets.join(", "));
    }
    Ok(())
}

fn write_ppm(path: &Path, image: &ImageBuffer) -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;

    let magic = match image.nr_channels() {
        1 => "P5",
        3 => "P6",
        n => return Err(format!("PPM output needs 1 or 3 channels, the image has {}", n).into()),
    };
    let mut file = fs::File::create(path)?;
    writeln!(file, "{}", magic)?;
    writeln!(file, "{} {}", image.width(), image.height())?;
    writeln!(file, "255")?;
    for y in 0..image.height() {
        if let Some(row) = image.row(y) {
            file.write_all(row)?;
        }
    }
    Ok(())
}
