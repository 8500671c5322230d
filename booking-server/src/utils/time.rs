//! 时间工具
//!
//! 预订日期校验统一使用服务器本地日期。

use chrono::{Local, NaiveDate};

/// 服务器本地时区的当前日期
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// 日期是否早于今天 (本地时区)
pub fn is_past_date(date: NaiveDate) -> bool {
    date < today_local()
}
