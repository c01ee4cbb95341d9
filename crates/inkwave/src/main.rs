use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{command, Arg, ArgAction};
use inkwave::OutputFormat;
use log::info;
use wbf::read::WbfFile;

fn main() -> Result<()> {
    let matches = command!()
        .max_term_width(100)
        .args(&[
            Arg::new("input")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("The waveform file to read"),
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the re-encoded waveform to <file>"),
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("format")
                .value_parser(["wbf", "wrf"])
                .default_value("wbf")
                .help("The output format"),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        ])
        .try_get_matches()
        .unwrap_or_else(|err| {
            // Usage errors exit with 1 like every other failure.
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print().ok();
            process::exit(code);
        });

    if matches.get_flag("verbose") {
        env_logger::builder()
            .format_level(false)
            .format_target(false)
            .filter_module("wbf", log::LevelFilter::Debug)
            .filter_module("inkwave", log::LevelFilter::Debug)
            .init();
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("wbf");
    let format = OutputFormat::from_name(format)?;

    let Some(in_path) = matches.get_one::<PathBuf>("input") else {
        return Err(anyhow!("Missing input file"));
    };
    let in_file = fs::File::open(in_path)
        .with_context(|| format!("Failed to open input file '{}'", in_path.display()))?;
    let in_data = unsafe { memmap2::Mmap::map(&in_file) }
        .with_context(|| format!("Failed to map input file '{}'", in_path.display()))?;
    let in_data = &*in_data;
    info!("Read {} bytes from '{}'", in_data.len(), in_path.display());
    let file = WbfFile::parse(in_data)
        .with_context(|| format!("Failed to parse input file '{}'", in_path.display()))?;

    {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        inkwave::print(&mut stdout, &file)
            .and_then(|()| stdout.flush())
            .with_context(|| "Failed to write output to stdout")?;
    }

    let Some(out_path) = matches.get_one::<PathBuf>("output") else {
        return Ok(());
    };

    let out_file = fs::File::create(out_path)
        .with_context(|| format!("Failed to create output file '{}'", out_path.display()))?;
    if let Err(err) = write_file(&file, format, out_file) {
        // The file was created or truncated above, so it is safe to remove.
        fs::remove_file(out_path).ok();
        return Err(err)
            .with_context(|| format!("Failed to write output file '{}'", out_path.display()));
    }
    info!("Wrote '{}'", out_path.display());
    Ok(())
}

fn write_file(file: &WbfFile<'_>, format: OutputFormat, out_file: fs::File) -> Result<()> {
    let mut writer = BufWriter::new(out_file);
    inkwave::rewrite(&mut writer, file, format)?;
    writer.flush()?;
    Ok(())
}
