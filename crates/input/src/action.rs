use castlefront_common::Side;

/// A high-level action produced from input and consumed by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ask for a new unit on the given side.
    SpawnUnit(Side),
    /// Start a fresh match.
    Restart,
    /// Show or hide the background grid.
    ToggleGrid,
    /// Show or hide the inspector panel.
    ToggleInspector,
    /// Leave the game.
    Quit,
    /// Input that means nothing to the game.
    Noop,
}

/// Keys the game reacts to, independent of any windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    R,
    G,
    F1,
    Escape,
    Other,
}
