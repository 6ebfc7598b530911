use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeathCause {
    /// Struck by a car or train.
    Hit,
    Drowned,
    /// Fell more than a tile below the bottom of the screen.
    LeftBehind,
    /// Carried off the side of the screen by a log.
    SweptAway,
}

/// Things the driver reacts to: scoring, sounds and warning lights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    ForwardHop { row: i32 },
    TrainWarning { lane: u32 },
    TrainArrived { lane: u32 },
    Died(DeathCause),
}
