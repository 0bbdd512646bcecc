use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use toon_codec::{DecodeOptions, Delimiter, EncodeOptions, Indent, KeyFolding, Value};

#[derive(Parser, Debug)]
#[command(name = "toon", version, about = "TOON encoder/decoder")]
struct Args {
    /// Input file path (.json or .toon). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode (overrides auto-detection).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode (overrides auto-detection).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Array delimiter: , (comma), \\t (tab), | (pipe).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Indentation size (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Print size statistics as a JSON object on stderr.
    #[arg(long)]
    stats: bool,

    /// Key folding mode: off, safe (default: off).
    #[arg(long = "keyFolding", alias = "key-folding", value_enum, value_name = "mode", default_value_t = KeyFoldingArg::Off)]
    key_folding: KeyFoldingArg,

    /// Maximum folded segment count when key folding is enabled.
    #[arg(long = "flattenDepth", alias = "flatten-depth", value_name = "number")]
    flatten_depth: Option<usize>,

    /// Tolerate array length declarations that disagree with the body.
    #[arg(long)]
    lenient: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KeyFoldingArg {
    Off,
    Safe,
}

impl From<KeyFoldingArg> for KeyFolding {
    fn from(value: KeyFoldingArg) -> Self {
        match value {
            KeyFoldingArg::Off => KeyFolding::Off,
            KeyFoldingArg::Safe => KeyFolding::Safe,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source)?;

    match mode {
        Mode::Encode => run_encode(&args, &input_text),
        Mode::Decode => run_decode(&args, &input_text),
    }
}

fn run_encode(args: &Args, input: &str) -> Result<(), Box<dyn Error>> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    let value = Value::from(json);

    let mut options = EncodeOptions::new()
        .with_indent(Indent::spaces(args.indent))
        .with_key_folding(args.key_folding.into())
        .with_flatten_depth(args.flatten_depth);
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }

    let toon = toon_codec::encode(&value, &options);
    write_output(args.output.as_deref(), toon.as_bytes())?;

    if args.stats {
        print_stats(&value, &toon)?;
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str) -> Result<(), Box<dyn Error>> {
    let options = DecodeOptions::new().with_lenient(args.lenient);
    let value = toon_codec::decode(input, &options)?;
    let json = serde_json::Value::from(value);

    with_output_writer(args.output.as_deref(), |writer| {
        write_json(writer, &json, args.indent)
    })
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }
    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(Mode::Encode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("toon") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode or --decode".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    match raw {
        "," => Ok(Delimiter::Comma),
        "|" => Ok(Delimiter::Pipe),
        "\t" => Ok(Delimiter::Tab),
        _ => Err(format!(
            "Invalid delimiter \"{raw}\". Valid delimiters are: comma (,), tab (\\t), pipe (|)"
        )),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    with_output_writer(path, |writer| {
        writer.write_all(data)?;
        Ok(())
    })
}

fn write_json(
    writer: &mut dyn Write,
    value: &serde_json::Value,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Byte-size comparison between the compact JSON rendering and the TOON
/// output, printed to stderr so it never mixes into piped output.
fn print_stats(value: &Value, toon: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(&serde_json::Value::from(value.clone()))?;
    let json_bytes = json.len();
    let toon_bytes = toon.len();
    let reduction_percent = if json_bytes > 0 {
        (1.0 - toon_bytes as f64 / json_bytes as f64) * 100.0
    } else {
        0.0
    };

    let stats = serde_json::json!({
        "jsonBytes": json_bytes,
        "toonBytes": toon_bytes,
        "reductionPercent": (reduction_percent * 10.0).round() / 10.0,
    });
    eprintln!("{stats}");
    Ok(())
}
