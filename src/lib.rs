//! 핵심 계산 로직을 라이브러리로 분리하여 CLI 외의 다른 화면에서도 같은 계산을 쓰도록 한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod perforation;
pub mod ui_cli;
