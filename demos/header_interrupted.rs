//! Deactivates the header two seconds in; nothing changes after that.

use std::time::Duration;

use appbar_motion::prelude::*;

fn main() -> Result<()> {
    let mut frames = 0usize;
    let status = App::new()
        .deactivate_after(Duration::from_secs(2))
        .on_update(move |view| {
            frames += 1;
            log::info!("frame {frames}: {} visible={:?}", view.phase, view.visible);
        })
        .run(TextPresenter::stdout())?;

    println!("timeline {status:?}");
    Ok(())
}
