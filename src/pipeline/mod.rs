//! 拆分流水线：解析 → 拆分 → 校验 → 落盘

pub mod materializer;
pub mod process;
