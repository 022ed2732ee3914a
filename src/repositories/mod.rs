pub mod indicators;

pub use indicators::{
    IndicatorFetcher, IndicatorQuery, IndicatorStore, PgIndicatorStore, SharedStore,
    SortDirection, TimeColumn,
};
