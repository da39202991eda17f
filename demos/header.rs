//! Plays the header once and prints a line per visible change.
//!
//! Run with `RUST_LOG=debug` to see each timeline step.

use std::sync::Arc;
use std::time::Duration;

use appbar_motion::prelude::*;

fn main() -> Result<()> {
    let bell = Arc::new(LogBellPlayer::new());

    let status = App::new()
        .linger(Duration::from_millis(800))
        .bell_player(bell.clone())
        .run(TextPresenter::stdout())?;

    println!("timeline {status:?}, bell played {} time(s)", bell.plays());
    Ok(())
}
