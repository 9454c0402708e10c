//! Background tasks started by `serve`.

mod scrape_task;

pub use scrape_task::spawn_scrape_task;
