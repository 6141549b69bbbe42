//! 页面数据加载状态
//!
//! 发请求时置 loading，成功后整体替换数据，失败时保留上一次的数据并弹出提示。

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

use crate::error::ApiResult;
use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    pub data: T,
    pub loading: bool,
}

impl<T: Default> Loadable<T> {
    /// 初次挂载时的状态：无数据、加载中
    pub fn pending() -> Self {
        Self {
            data: T::default(),
            loading: true,
        }
    }
}

impl<T> Loadable<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// 写入请求结果，返回需要提示的错误
    pub fn resolve<E>(&mut self, result: Result<T, E>) -> Option<E> {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                None
            }
            Err(e) => Some(e),
        }
    }
}

/// 列表区域应展示的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    /// 首次加载中，还没有任何数据
    Spinner,
    /// 加载完成但列表为空
    Empty,
    /// 渲染的卡片 / 行数
    Items(usize),
}

impl<T> Loadable<Vec<T>> {
    /// 刷新期间保留旧数据，不回退到加载动画
    pub fn list_view(&self) -> ListView {
        match (self.loading, self.data.len()) {
            (true, 0) => ListView::Spinner,
            (false, 0) => ListView::Empty,
            (_, n) => ListView::Items(n),
        }
    }
}

/// 在 UI 任务队列上执行请求并把结果写回 `state`
///
/// 组件已卸载时（信号已释放）结果被丢弃。
pub fn load_into<T, F>(
    state: RwSignal<Loadable<T>>,
    notifier: Notifier,
    fallback: &'static str,
    request: F,
) where
    T: Send + Sync + 'static,
    F: Future<Output = ApiResult<T>> + 'static,
{
    state.update(Loadable::begin);
    spawn_local(async move {
        let result = request.await;
        if let Some(err) = state.try_update(|s| s.resolve(result)).flatten() {
            log_warn!("[Load] {}: {}", fallback, err);
            notifier.error(err.message_or(fallback));
        }
    });
}

/// 执行写操作并写回刷新后的数据
///
/// 结果为 `Ok(None)` 表示操作被取消（如未确认删除），不提示也不改动状态。
pub fn mutate_into<T, F>(
    state: RwSignal<Loadable<T>>,
    notifier: Notifier,
    success: &'static str,
    failure: &'static str,
    mutation: F,
) where
    T: Send + Sync + 'static,
    F: Future<Output = ApiResult<Option<T>>> + 'static,
{
    spawn_local(async move {
        match mutation.await {
            Ok(Some(data)) => {
                state.try_update(|s| s.data = data);
                notifier.success(success);
            }
            Ok(None) => {}
            Err(err) => {
                log_warn!("[Mutate] {}: {}", failure, err);
                notifier.error(err.message_or(failure));
            }
        }
    });
}
