use std::sync::atomic::{AtomicBool, Ordering};

use bbgurl::context::Environment;
use bbgurl::status::ExitStatus;
use bbgurl::{core, progress, signals};

/// Entry point - catches Ctrl+C and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    // The handler only raises the interrupt; the transfer loop notices it,
    // restores the terminal and closes the output itself.
    ctrlc::set_handler(move || {
        signals::set_interrupted();

        // On second Ctrl+C, force exit (user really wants out)
        static SECOND_CTRL_C: AtomicBool = AtomicBool::new(false);
        if SECOND_CTRL_C.swap(true, Ordering::SeqCst) {
            progress::force_restore();
            eprintln!("\nInterrupted");
            std::process::exit(ExitStatus::Interrupted as i32);
        }
    })
    .ok();

    let args: Vec<String> = std::env::args().collect();
    let env = Environment::init();

    // A Ctrl+C that lands after the transfer finished does not change the outcome
    core::run(args, env)
}
