pub mod webtoon;

pub use webtoon::{NewWebtoon, Webtoon, WebtoonSummary};
