use clap::Parser;
use local_pairwise_aligner::{
    cli::{Cli, Summary},
    prelude::*,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    ops::ControlFlow,
};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();

    let sw = SW::new(args.scoring.score_model());
    log::info!("Scoring: {}", sw.sm);

    let mut output = args
        .output
        .as_ref()
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;
    let mut summary = Summary::default();

    args.process_input_pairs(|a: Seq, b: Seq| {
        let json = output.as_mut().map(|w| w as &mut dyn Write);
        args.report_pair(&sw, a, b, &mut std::io::stdout(), json, &mut summary)?;
        Ok(ControlFlow::Continue(()))
    })?;

    if let Some(out) = &mut output {
        out.flush()?;
    }
    if args.silent <= 1 {
        println!("{summary}");
    }
    Ok(())
}
