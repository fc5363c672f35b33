//! Command-line front end: decode a baseline JPEG to raw PPM.

use std::env;
use std::fs;
use std::io::BufWriter;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <input.jpg> <output.ppm>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("{}: {}", args[1], e);
        process::exit(1);
    }
}

fn run(input: &str, output: &str) -> zendec::Result<()> {
    let data = fs::read(input)?;
    let image = zendec::decode(&data)?;

    let mut out = BufWriter::new(fs::File::create(output)?);
    zendec::ppm::write_ppm(&mut out, image.width(), image.height(), image.pixels())?;
    Ok(())
}
