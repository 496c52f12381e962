//! 宽限期定时器

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 一次性宽限期定时器
///
/// 到期后在阻塞线程池上执行回调，回调收到定时器的取消令牌。取消之后回调不会再被调用；
/// 回调若已开始执行，需要在自己的锁内检查令牌是否已取消。
pub struct GraceTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl GraceTimer {
    /// 启动定时器
    pub fn arm<F>(runtime: &Handle, timeout: Duration, on_expire: F) -> Self
    where
        F: FnOnce(CancellationToken) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let expired = token.clone();
        let handle = runtime.spawn(async move {
            select! {
                biased;
                _ = cancelled.cancelled() => {
                    debug!("宽限期定时器已取消");
                }
                _ = tokio::time::sleep(timeout) => {
                    if cancelled.is_cancelled() {
                        return;
                    }
                    debug!("宽限期定时器到期: {:?}", timeout);
                    if let Err(e) = tokio::task::spawn_blocking(move || on_expire(expired)).await {
                        warn!("宽限期到期回调异常结束: {}", e);
                    }
                }
            }
        });
        Self { token, handle }
    }

    /// 取消令牌
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// 取消定时器
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 是否已取消
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 定时任务是否已结束
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for GraceTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
