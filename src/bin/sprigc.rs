use std::path::Path;
use std::time::Instant;

use log::info;

use sprig_lang::*;

fn main() {
    if let Err(code) = run() {
        std::process::exit(code);
    }
}

fn run() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(msg) = configure_logging(level, config.value_of("log-file")) {
            print_errs(&[format!("Failed to configure logger: {}", msg)]);
        }
    }

    let input = config.value_of("input").ok_or(ERR_LOAD_ERROR)?;
    let (loader, file_id) = FileLoader::for_file(Path::new(input)).map_err(|msg| {
        print_errs(&[msg]);
        ERR_LOAD_ERROR
    })?;

    let stop_stage = get_stage(&config);
    let mut project = Project::new(loader);

    match stop_stage {
        Some(Stage::Lexer) => {
            let tokens = project.tokenize(&file_id).map_err(report)?;
            info!("{}: {} tokens", file_id, tokens.len());
            return Ok(());
        }
        Some(Stage::Parser) => {
            let module = project.load(&file_id).map_err(report)?;
            info!("{}: {} items", file_id, module.items().len());
            return Ok(());
        }
        Some(Stage::Semantic) | None => (),
    }

    let compile_time = Instant::now();
    project.compile(&file_id).map_err(report)?;
    info!(
        "Compiled {} files in {}s",
        project.verified_files().len(),
        compile_time.elapsed().as_secs_f32()
    );

    if stop_stage == Some(Stage::Semantic) {
        return Ok(());
    }

    if let Some(emit) = get_emit(&config) {
        let layout = project.layout();
        let text = match emit {
            Emit::LayoutYaml => layout.to_yaml().map_err(|e| e.to_string()),
            Emit::LayoutJson => layout.to_json().map_err(|e| e.to_string()),
        }
        .map_err(|msg| {
            print_errs(&[msg]);
            ERR_LAYOUT_WRITE_ERROR
        })?;

        match config.value_of("output") {
            Some(output) => std::fs::write(output, text).map_err(|e| {
                print_errs(&[format!("{}: {}", output, e)]);
                ERR_LAYOUT_WRITE_ERROR
            })?,
            None => println!("{}", text),
        }
    }

    Ok(())
}

fn report(err: ProjectError) -> i32 {
    print_errs(&[err.to_string()]);
    exit_code(&err)
}
