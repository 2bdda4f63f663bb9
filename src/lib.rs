pub mod cache;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod filter;
pub mod lidarr;
pub mod logging;
pub mod normalize;
pub mod observer;
pub mod sources;

pub use crate::calendar::CalendarFeed;
pub use crate::controller::RunController;
pub use crate::discovery::DiscoveryRun;
pub use crate::domain::{ArtistSelection, Gig, GigKey};
pub use crate::error::{AgendaError, Result};
pub use crate::observer::{GigObserver, ObserverSet};
pub use crate::sources::{GigSource, SongkickSource};
