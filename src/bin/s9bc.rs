extern crate log;
extern crate simplelog;

use std::fs::File;
use std::time::Instant;

use log::debug;

use s9b::compiler::{check, compile, CompileOutput, Source};
use s9b::cpu::Cpu;
use s9b::*;

fn main() -> Result<(), i32> {
    let args = configure_cli().get_matches();

    if let Some(level) = get_log_level(&args) {
        if let Err(msg) = configure_logging(level) {
            eprintln!("{}", msg);
        }
    }

    let input = args
        .value_of("input")
        .expect("clap requires an input source file");
    let text = std::fs::read_to_string(input).map_err(|e| {
        eprintln!("Could not read {}: {}", input, e);
        ERR_IO_ERROR
    })?;
    let src = Source::new(&text);

    let config = get_machine_config(&args).map_err(|msg| {
        eprintln!("{}", msg);
        ERR_CONFIG_ERROR
    })?;
    let word_size = config.validate().map_err(|e| {
        eprintln!("{}", e);
        ERR_CONFIG_ERROR
    })?;

    let stop_stage = get_stage(&args).map_err(|msg| {
        eprintln!("{}", msg);
        ERR_CONFIG_ERROR
    })?;
    if let Some(stage) = stop_stage {
        let diags = check(&src, word_size, stage);
        print_errs(&diags, &src);
        return if diags.is_empty() {
            Ok(())
        } else {
            Err(exit_code(&diags))
        };
    }

    let compile_time = Instant::now();
    let compiled = match compile(&src, word_size) {
        Ok(compiled) => compiled,
        Err(diags) => {
            print_errs(&diags, &src);
            return Err(exit_code(&diags));
        }
    };
    eprintln!("Assembler: {}", compile_time.elapsed().as_secs_f32());
    for note in &compiled.annotations {
        debug!("{:?}: {}", note.span, note.text);
    }

    if let Some(path) = args.value_of("output") {
        write_image(path, &compiled).map_err(|msg| {
            eprintln!("Failed to write memory image: {}", msg);
            ERR_IO_ERROR
        })?;
    }

    if let Some(path) = args.value_of("manifest") {
        let manifest = Manifest::extract(&compiled.output);
        match File::create(path)
            .map_err(|e| format!("{}", e))
            .and_then(|f| manifest.write(f).map_err(|e| format!("{}", e)))
        {
            Ok(()) => (),
            Err(e) => {
                eprintln!("Failed to write manifest file: {}", e);
                return Err(ERR_IO_ERROR);
            }
        }
    }

    if args.is_present("run") {
        run(&config, &compiled, args.is_present("trace"))?;
    }

    Ok(())
}

fn write_image(path: &str, compiled: &CompileOutput) -> s9b::result::Result<()> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::to_writer_pretty(file, &compiled.output).map_err(|e| format!("{}: {}", path, e))
}

fn run(config: &s9b::config::MachineConfig, compiled: &CompileOutput, trace: bool) -> Result<(), i32> {
    let mut cpu = Cpu::from_config(config).map_err(|e| {
        eprintln!("{}", e);
        ERR_CONFIG_ERROR
    })?;
    cpu.load_program(&compiled.output).map_err(|e| {
        eprintln!("{}", e);
        ERR_RUN_ERROR
    })?;

    let run_time = Instant::now();
    for line in cpu.run(config.max_ticks) {
        if trace || !line.starts_with("[RUN]") {
            println!("{}", line);
        }
    }
    eprintln!(
        "Interpreter: {} ticks in {}",
        cpu.ticks(),
        run_time.elapsed().as_secs_f32()
    );

    if cpu.last_fault().is_some() {
        return Err(ERR_RUN_ERROR);
    }
    if !cpu.is_stopped() {
        eprintln!("The program did not stop within {} ticks", config.max_ticks);
        return Err(ERR_RUN_ERROR);
    }
    Ok(())
}
