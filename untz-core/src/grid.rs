//! Composite grid: maps (x, y) onto the key numbers of tiled 4×4 modules.
//!
//! Modules sit on a grid of blocks, filled row by row:
//!
//! ```text
//! 8 modules (16×8):        4 modules (8×8):
//! +----+----+----+----+    +----+----+
//! | m0 | m1 | m2 | m3 |    | m0 | m1 |
//! +----+----+----+----+    +----+----+
//! | m4 | m5 | m6 | m7 |    | m2 | m3 |
//! +----+----+----+----+    +----+----+
//! ```
//!
//! Inside a module keys run row-major, so the absolute index of a key is
//! `module * 16 + (y % 4) * 4 + (x % 4)`.

use crate::matrix::{MatrixModule, KEYS_PER_MODULE, MAX_MODULES, MODULE_SIDE};
use heapless::Vec;

/// Error type for grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// More than [`MAX_MODULES`] modules.
    TooManyModules,
    /// No hardware-confirmed arrangement exists for this module count;
    /// use [`GridMapper::with_layout`].
    LayoutUnconfirmed,
    /// Modules do not fill whole rows of blocks.
    RaggedLayout,
    /// A present module follows an empty slot.
    ModuleGap,
}

/// Pure coordinate arithmetic for a grid of tiled modules.
///
/// # Example
///
/// ```
/// use untz_core::GridMapper;
///
/// let grid = GridMapper::new(4).unwrap();
/// assert_eq!((grid.width(), grid.height()), (8, 8));
/// assert_eq!(grid.xy_to_index(4, 0), 16);
/// assert_eq!(grid.index_to_xy(16), (4, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridMapper {
    modules: u8,
    blocks_per_row: u8,
    width: u8,
    height: u8,
}

impl GridMapper {
    /// Layout for a module count with a known physical arrangement.
    ///
    /// | Modules | Blocks | Keys  |
    /// |---------|--------|-------|
    /// | 0       | -      | 0×0   |
    /// | 1       | 1×1    | 4×4   |
    /// | 2       | 2×1    | 8×4   |
    /// | 4       | 2×2    | 8×8   |
    /// | 8       | 4×2    | 16×8  |
    ///
    /// Other counts return [`GridError::LayoutUnconfirmed`].
    pub fn new(modules: u8) -> Result<Self, GridError> {
        let blocks_per_row = match modules {
            0 | 1 => 1,
            2 | 4 => 2,
            8 => 4,
            n if usize::from(n) > MAX_MODULES => return Err(GridError::TooManyModules),
            _ => return Err(GridError::LayoutUnconfirmed),
        };
        Self::with_layout(modules, blocks_per_row)
    }

    /// Layout with an explicit number of blocks per row.
    ///
    /// `modules` must be a whole number of rows. Zero modules gives an empty
    /// grid regardless of `blocks_per_row`.
    pub fn with_layout(modules: u8, blocks_per_row: u8) -> Result<Self, GridError> {
        if usize::from(modules) > MAX_MODULES {
            return Err(GridError::TooManyModules);
        }
        if modules == 0 {
            return Ok(Self {
                modules: 0,
                blocks_per_row: 1,
                width: 0,
                height: 0,
            });
        }
        if blocks_per_row == 0 || modules % blocks_per_row != 0 {
            return Err(GridError::RaggedLayout);
        }
        Ok(Self {
            modules,
            blocks_per_row,
            width: blocks_per_row * MODULE_SIDE,
            height: (modules / blocks_per_row) * MODULE_SIDE,
        })
    }

    #[inline]
    #[must_use]
    pub const fn module_count(&self) -> u8 {
        self.modules
    }

    #[inline]
    #[must_use]
    pub const fn blocks_per_row(&self) -> u8 {
        self.blocks_per_row
    }

    /// Columns of keys.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Rows of keys.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Total keys, `width * height`.
    #[inline]
    #[must_use]
    pub const fn key_count(&self) -> u8 {
        self.modules * KEYS_PER_MODULE
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height
    }

    /// Absolute key index of column `x`, row `y`.
    ///
    /// Requires `x < width()` and `y < height()`; other inputs give an
    /// unspecified index.
    #[must_use]
    pub fn xy_to_index(&self, x: u8, y: u8) -> u8 {
        debug_assert!(self.contains(x, y), "({}, {}) outside grid", x, y);
        let (bx, by) = (x / MODULE_SIDE, y / MODULE_SIDE);
        let slot = by.wrapping_mul(self.blocks_per_row).wrapping_add(bx);
        let local = (y % MODULE_SIDE) * MODULE_SIDE + x % MODULE_SIDE;
        slot.wrapping_mul(KEYS_PER_MODULE).wrapping_add(local)
    }

    /// Column and row of absolute key index `index`.
    ///
    /// Requires `index < key_count()`; other inputs give an unspecified
    /// position.
    #[must_use]
    pub fn index_to_xy(&self, index: u8) -> (u8, u8) {
        debug_assert!(index < self.key_count(), "index {} outside grid", index);
        let (slot, local) = (index / KEYS_PER_MODULE, index % KEYS_PER_MODULE);
        let (bx, by) = (slot % self.blocks_per_row, slot / self.blocks_per_row);
        (
            bx.wrapping_mul(MODULE_SIDE).wrapping_add(local % MODULE_SIDE),
            by.wrapping_mul(MODULE_SIDE).wrapping_add(local / MODULE_SIDE),
        )
    }
}

/// Tiled matrix modules addressed as one surface.
///
/// Wraps the modules rather than extending them: absolute-index LED and key
/// operations are routed to module `index / 16`, key `index % 16`, and the
/// [`GridMapper`] supplies coordinates. Indices past the last module are
/// ignored or read as `false`.
pub struct Grid<M> {
    modules: Vec<M, MAX_MODULES>,
    mapper: GridMapper,
}

impl<M: MatrixModule> Grid<M> {
    /// Build a grid from present modules, in slot order.
    pub fn new(modules: impl IntoIterator<Item = M>) -> Result<Self, GridError> {
        let modules = collect_modules(modules)?;
        let mapper = GridMapper::new(modules.len() as u8)?;
        Ok(Self { modules, mapper })
    }

    /// Build a grid with an explicit number of blocks per row.
    pub fn with_layout(
        modules: impl IntoIterator<Item = M>,
        blocks_per_row: u8,
    ) -> Result<Self, GridError> {
        let modules = collect_modules(modules)?;
        let mapper = GridMapper::with_layout(modules.len() as u8, blocks_per_row)?;
        Ok(Self { modules, mapper })
    }

    /// Build a grid from an ordered slot list where absent modules are `None`.
    ///
    /// Empty slots may only trail the present ones.
    pub fn from_slots(slots: impl IntoIterator<Item = Option<M>>) -> Result<Self, GridError> {
        let mut modules = Vec::new();
        let mut ended = false;
        for slot in slots {
            match slot {
                Some(_) if ended => return Err(GridError::ModuleGap),
                Some(module) => modules
                    .push(module)
                    .map_err(|_| GridError::TooManyModules)?,
                None => ended = true,
            }
        }
        let mapper = GridMapper::new(modules.len() as u8)?;
        Ok(Self { modules, mapper })
    }

    #[inline]
    #[must_use]
    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u8 {
        self.mapper.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u8 {
        self.mapper.height()
    }

    /// See [`GridMapper::xy_to_index`].
    #[must_use]
    pub fn xy_to_index(&self, x: u8, y: u8) -> u8 {
        self.mapper.xy_to_index(x, y)
    }

    /// See [`GridMapper::index_to_xy`].
    #[must_use]
    pub fn index_to_xy(&self, index: u8) -> (u8, u8) {
        self.mapper.index_to_xy(index)
    }

    pub fn module(&self, slot: usize) -> Option<&M> {
        self.modules.get(slot)
    }

    pub fn module_mut(&mut self, slot: usize) -> Option<&mut M> {
        self.modules.get_mut(slot)
    }

    pub fn set_led(&mut self, index: u8) {
        if let Some((module, key)) = self.route_mut(index) {
            module.set_led(key);
        }
    }

    pub fn clear_led(&mut self, index: u8) {
        if let Some((module, key)) = self.route_mut(index) {
            module.clear_led(key);
        }
    }

    /// Flip the LED at `index`. Returns the new state.
    pub fn toggle_led(&mut self, index: u8) -> bool {
        let on = !self.is_led_set(index);
        if on {
            self.set_led(index);
        } else {
            self.clear_led(index);
        }
        on
    }

    /// Turn every LED off in the local buffers.
    pub fn clear(&mut self) {
        for module in &mut self.modules {
            for key in 0..KEYS_PER_MODULE {
                module.clear_led(key);
            }
        }
    }

    #[must_use]
    pub fn is_led_set(&self, index: u8) -> bool {
        self.route(index)
            .is_some_and(|(module, key)| module.is_led_set(key))
    }

    #[must_use]
    pub fn is_key_pressed(&self, index: u8) -> bool {
        self.route(index)
            .is_some_and(|(module, key)| module.is_key_pressed(key))
    }

    #[must_use]
    pub fn just_pressed(&self, index: u8) -> bool {
        self.route(index)
            .is_some_and(|(module, key)| module.just_pressed(key))
    }

    #[must_use]
    pub fn just_released(&self, index: u8) -> bool {
        self.route(index)
            .is_some_and(|(module, key)| module.just_released(key))
    }

    /// Set the LED at column `x`, row `y`. Does nothing outside the grid.
    pub fn set_led_xy(&mut self, x: u8, y: u8) {
        if self.mapper.contains(x, y) {
            let index = self.mapper.xy_to_index(x, y);
            self.set_led(index);
        }
    }

    /// Clear the LED at column `x`, row `y`. Does nothing outside the grid.
    pub fn clear_led_xy(&mut self, x: u8, y: u8) {
        if self.mapper.contains(x, y) {
            let index = self.mapper.xy_to_index(x, y);
            self.clear_led(index);
        }
    }

    /// Push every module's LED buffer to hardware, in slot order.
    pub async fn write_display(&mut self) -> Result<(), M::Error> {
        for module in &mut self.modules {
            module.write_display().await?;
        }
        Ok(())
    }

    /// Scan every module. Resolves to `true` if any key changed.
    pub async fn read_switches(&mut self) -> Result<bool, M::Error> {
        let mut changed = false;
        for module in &mut self.modules {
            changed |= module.read_switches().await?;
        }
        Ok(changed)
    }

    /// Iterate absolute indices of keys that went down in the latest scan.
    pub fn pressed_keys(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.mapper.key_count()).filter(|&index| self.just_pressed(index))
    }

    /// Release the modules, in slot order.
    pub fn into_modules(self) -> Vec<M, MAX_MODULES> {
        self.modules
    }

    fn route(&self, index: u8) -> Option<(&M, u8)> {
        let module = self.modules.get(usize::from(index / KEYS_PER_MODULE))?;
        Some((module, index % KEYS_PER_MODULE))
    }

    fn route_mut(&mut self, index: u8) -> Option<(&mut M, u8)> {
        let module = self
            .modules
            .get_mut(usize::from(index / KEYS_PER_MODULE))?;
        Some((module, index % KEYS_PER_MODULE))
    }
}

fn collect_modules<M>(
    modules: impl IntoIterator<Item = M>,
) -> Result<Vec<M, MAX_MODULES>, GridError> {
    let mut collected = Vec::new();
    for module in modules {
        collected
            .push(module)
            .map_err(|_| GridError::TooManyModules)?;
    }
    Ok(collected)
}
