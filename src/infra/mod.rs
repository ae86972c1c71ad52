//! Инфраструктурный слой вокруг движка:
//! - RNG-реализации для движка;
//! - абстракция хранения снэпшотов (тесты, dev CLI).

pub mod persistence;
pub mod rng;

pub use persistence::*;
pub use rng::*;
