//! 按员工串行化 "额度校验 → 插入"
//!
//! 同一员工的并发请假提交在本进程内逐个执行，避免两次校验都读到旧余额。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct EmployeeLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取员工锁，guard 释放前其他同员工请求等待
    pub async fn lock(&self, employee_id: i64) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// 员工删除后移除
    pub fn remove(&self, employee_id: i64) {
        self.locks.remove(&employee_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
