use log::error;

mod audio;
mod cli;
mod disassemble;
mod keymap;
mod run;

use cli::Commands;

fn main() {
    let cli = cli::init();
    let result = match cli.command {
        Commands::Run {
            rom,
            cycles_per_frame,
            volume,
            scale,
        } => run::run(
            &rom,
            &run::Settings {
                cycles_per_frame,
                volume,
                scale,
            },
        ),
        Commands::Disassemble { rom, output } => disassemble::disassemble(&rom, output),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
