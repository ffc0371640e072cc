// 日誌工具

/// 初始化日誌；`-D/--debug` 時輸出 debug 等級
pub fn init_logger(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };

    // 重複初始化（例如測試中）時忽略錯誤
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}
