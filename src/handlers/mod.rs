// Route handlers. Webtoon reads and the system probes are public; webtoon
// writes sit behind `middleware::require_bearer` (see `app::router`).
pub mod system;
pub mod webtoons;
