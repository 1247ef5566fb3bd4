pub mod db_utils;
pub mod work_time;
