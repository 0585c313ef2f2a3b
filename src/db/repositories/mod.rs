mod drills;
mod logs;
