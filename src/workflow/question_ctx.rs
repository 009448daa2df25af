//! 问题处理上下文
//!
//! 封装"我正在处理本次运行的第几个问题"这一信息

use std::fmt::Display;

use crate::models::question::QuestionId;

/// 问题处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 本次运行中的序号（从1开始）
    pub ordinal: usize,

    /// 本次运行的问题总数（仅用于日志显示）
    pub total: usize,

    /// 问题 id，也是引用编号的命名空间
    pub question_id: QuestionId,
}

impl QuestionCtx {
    /// 创建新的问题上下文
    pub fn new(ordinal: usize, total: usize, question_id: QuestionId) -> Self {
        Self {
            ordinal,
            total,
            question_id,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[问题 {}/{} ID#{}]",
            self.ordinal, self.total, self.question_id
        )
    }
}
