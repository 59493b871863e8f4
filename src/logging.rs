//! 跨平台日志模块
//!
//! wasm32 目标输出到浏览器控制台，宿主目标输出到标准流，
//! 使测试运行时也能看到导航日志。

#[allow(unused)]
pub(crate) fn info_str(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", msg);
}

#[allow(unused)]
pub(crate) fn error_str(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", msg);
}

macro_rules! log_info {
    ($($t:tt)*) => {
        $crate::logging::info_str(&format!($($t)*))
    };
}

macro_rules! log_error {
    ($($t:tt)*) => {
        $crate::logging::error_str(&format!($($t)*))
    };
}

pub(crate) use {log_error, log_info};
