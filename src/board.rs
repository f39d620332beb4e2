//! Bring-up and display settings for the Trellis grid.

use defmt::{error, info, Debug2Format};
use embedded_hal_async::i2c::I2c;
use untz_core::{BlinkRate, Grid, GridError, Trellis};

/// Trellis grid on any async I2C bus.
pub type TrellisGrid<I2C> = Grid<Trellis<I2C>>;

/// Build the grid from `(bus, address)` pairs in slot order and start every
/// module.
///
/// A module that fails to start is logged and kept, so the rest of the grid
/// still works; only layout errors are returned.
pub async fn init_grid<I2C: I2c>(
    modules: impl IntoIterator<Item = (I2C, u8)>,
) -> Result<TrellisGrid<I2C>, GridError> {
    let mut grid = Grid::new(
        modules
            .into_iter()
            .map(|(bus, address)| Trellis::new(bus, address)),
    )?;

    let count = usize::from(grid.mapper().module_count());
    for slot in 0..count {
        let Some(module) = grid.module_mut(slot) else {
            continue;
        };
        if let Err(e) = module.begin().await {
            error!(
                "Trellis {=u8:#x} did not start: {}",
                module.address(),
                Debug2Format(&e)
            );
        }
    }

    info!(
        "Grid ready: {} modules, {}x{} keys",
        count,
        grid.width(),
        grid.height()
    );
    Ok(grid)
}

/// Map an encoder value onto a blink mode, `0..=3`.
#[must_use]
pub fn blink_rate(value: i16) -> BlinkRate {
    match value {
        i16::MIN..=0 => BlinkRate::Off,
        1 => BlinkRate::TwoHz,
        2 => BlinkRate::OneHz,
        _ => BlinkRate::HalfHz,
    }
}

/// Apply brightness and blink mode to every module.
pub async fn apply_display_settings<I2C: I2c>(
    grid: &mut TrellisGrid<I2C>,
    brightness: i16,
    blink: BlinkRate,
) {
    let level = brightness.clamp(0, i16::from(untz_core::trellis::MAX_BRIGHTNESS)) as u8;
    for slot in 0..usize::from(grid.mapper().module_count()) {
        let Some(module) = grid.module_mut(slot) else {
            continue;
        };
        let result = async {
            module.set_brightness(level).await?;
            module.set_blink_rate(blink).await
        }
        .await;
        if let Err(e) = result {
            error!(
                "Trellis {=u8:#x} settings failed: {}",
                module.address(),
                Debug2Format(&e)
            );
        }
    }
}
