use argh::FromArgs;
use image::{DynamicImage, ImageFormat, RgbaImage};
use qoi::{decode::BytesDecodeOutput, Header, QoiDecodeContext, QoiEncodeContext, Rgba};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    str::FromStr,
};

/// QOI cli encoder and decoder.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Encode(Encode),
    Decode(Decode),
    Info(Info),
}

/// Decodes a QOI image.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
struct Decode {
    /// output format (png, jpg, bmp)
    #[argh(option)]
    format: Format,

    /// the QOI input file
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

/// Encodes an image as QOI.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
struct Encode {
    /// input format, optional (png, jpg, bmp)
    #[argh(option)]
    format: Option<Format>,

    /// the input file. May be a PNG, JPG, or BMP.
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

/// Prints the header of a QOI image.
#[derive(FromArgs)]
#[argh(subcommand, name = "info")]
struct Info {
    /// the QOI input file
    #[argh(positional)]
    input: String,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Png,
    Jpg,
    Bmp,
}

impl Format {
    fn image_format(self) -> ImageFormat {
        match self {
            Format::Png => ImageFormat::Png,
            Format::Jpg => ImageFormat::Jpeg,
            Format::Bmp => ImageFormat::Bmp,
        }
    }
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("jpg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("jpeg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
        else { return Err("invalid string"); };

        Ok(format)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { command } = argh::from_env();

    match command {
        Command::Encode(options) => encode(options),
        Command::Decode(options) => decode(options),
        Command::Info(options) => info(options),
    }
}

fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let Encode {
        format,
        input,
        output,
    } = options;

    let image = match format {
        Some(format) => {
            image::io::Reader::with_format(BufReader::new(File::open(&input)?), format.image_format())
                .decode()?
        }
        None => image::io::Reader::open(&input)?
            .with_guessed_format()?
            .decode()?,
    };

    let width = image.width();
    let height = image.height();

    log::info!("Encoding {width}x{height} image from `{input}`");

    let pixels = image
        .into_rgba8()
        .pixels()
        .map(|p| Rgba::from(p.0))
        .collect::<Vec<_>>();

    let mut w = BufWriter::new(File::create(&output)?);
    QoiEncodeContext::encode(width, height, &pixels, &mut w)?;
    w.flush()?;

    let written = w.get_ref().metadata()?.len();
    log::info!("Written {written} bytes to `{output}`");

    Ok(())
}

fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let Decode {
        format,
        input,
        output,
    } = options;

    let qoi_input = std::fs::read(&input)?;

    log::info!("Decoding `{input}`");

    let mut raw = Vec::new();
    let Header { width, height, .. } =
        QoiDecodeContext::decode(&qoi_input, BytesDecodeOutput::new(&mut raw))?;

    let image = RgbaImage::from_raw(width, height, raw).ok_or("failed to create image")?;

    match format {
        // JPEG has no alpha channel
        Format::Jpg => DynamicImage::ImageRgba8(image)
            .into_rgb8()
            .save_with_format(&output, format.image_format())?,
        Format::Png | Format::Bmp => image.save_with_format(&output, format.image_format())?,
    }

    log::info!("Written {width}x{height} image to `{output}`");

    Ok(())
}

fn info(options: Info) -> Result<(), Box<dyn std::error::Error>> {
    let Info { input } = options;

    let header = Header::read_from(BufReader::new(File::open(&input)?))?;
    let Header {
        width,
        height,
        channels,
        colorspace,
    } = header;

    println!("{input}: {width}x{height}, {channels:?} ({} channels), {colorspace:?}", channels as u8);

    Ok(())
}
