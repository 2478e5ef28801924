// ==========================================
// 设备维护管理系统 - 工单文档
// ==========================================
// 结构: 标题 → 基本信息表 → 日期表 → [描述] → [维护人员表] → [备件表]
//       → 签字栏 → 页脚
// 输出: 定长分页的纯文本，页间以换页符 (\x0c) 分隔
// ==========================================

use crate::domain::work_order::WorkOrderDetail;
use crate::export::error::ExportResult;
use crate::export::labels::{
    format_date, format_optional_date, not_available, priority_label, status_label, type_label,
    yes_no,
};
use crate::i18n::{t_in, t_in_with_args};
use std::path::Path;

/// 默认每页正文行数
pub const DEFAULT_PAGE_HEIGHT: usize = 56;

/// 描述块换行宽度（字符）
const DESCRIPTION_WIDTH: usize = 80;

const SIGNATURE_LINE_WIDTH: usize = 40;

const PAGE_BREAK: char = '\x0c';

// ==========================================
// 文档结构
// ==========================================

/// 带表头的简单表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 按字符宽度对齐渲染
    fn render(&self) -> Vec<String> {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate().take(columns) {
                widths[idx] = widths[idx].max(cell.chars().count());
            }
        }

        let border = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );
        let format_row = |cells: &[String]| -> String {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(idx, width)| {
                    let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                    let fill = width - cell.chars().count();
                    format!(" {}{} ", cell, " ".repeat(fill))
                })
                .collect();
            format!("|{}|", padded.join("|"))
        };

        let mut lines = vec![border.clone(), format_row(&self.headers), border.clone()];
        for row in &self.rows {
            lines.push(format_row(row));
        }
        lines.push(border);
        lines
    }
}

/// 工单文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderDocument {
    pub code: String,
    pub title: String,
    pub details: Table,
    pub dates: Table,
    pub description: Option<(String, String)>, // (标题, 正文)
    pub maintainers: Option<Table>,
    pub parts: Option<Table>,
    pub signature: String,
    pub footer: String,
    locale: String,
}

impl WorkOrderDocument {
    /// 由工单详情组装文档（无维护人员/备件时省略对应表格）
    pub fn build(detail: &WorkOrderDetail, locale: &str) -> Self {
        let wo = &detail.work_order;
        let na = not_available(locale);

        let details = Table::new(
            vec![
                t_in(locale, "export.columns.code"),
                t_in(locale, "export.columns.type"),
                t_in(locale, "export.columns.status"),
                t_in(locale, "export.columns.priority"),
                t_in(locale, "export.columns.equipment"),
            ],
            vec![vec![
                wo.code.clone(),
                type_label(locale, wo.maintenance_type),
                status_label(locale, wo.status),
                priority_label(locale, wo.priority),
                detail
                    .equipment
                    .as_ref()
                    .map(|eq| eq.name.clone())
                    .unwrap_or_else(|| na.clone()),
            ]],
        );

        let dates = Table::new(
            vec![
                t_in(locale, "export.columns.scheduled_date"),
                t_in(locale, "document.started"),
                t_in(locale, "document.completed"),
                t_in(locale, "export.columns.machine_down"),
            ],
            vec![vec![
                format_date(locale, wo.scheduled_date),
                format_optional_date(locale, wo.started_at, "labels.not_started"),
                format_optional_date(locale, wo.completed_at, "labels.not_completed"),
                yes_no(locale, wo.machine_down),
            ]],
        );

        let description = wo
            .description
            .as_ref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| (t_in(locale, "document.description"), d.clone()));

        let maintainers = if detail.maintainers.is_empty() {
            None
        } else {
            Some(Table::new(
                vec![
                    t_in(locale, "document.maintainer_name"),
                    t_in(locale, "document.maintainer_role"),
                ],
                detail
                    .maintainers
                    .iter()
                    .map(|m| vec![m.name.clone(), m.role.clone().unwrap_or_else(|| na.clone())])
                    .collect(),
            ))
        };

        let parts = if detail.parts.is_empty() {
            None
        } else {
            Some(Table::new(
                vec![
                    t_in(locale, "export.columns.code"),
                    t_in(locale, "document.part_name"),
                    t_in(locale, "document.part_quantity"),
                ],
                detail
                    .parts
                    .iter()
                    .map(|p| vec![p.code.clone(), p.name.clone(), p.quantity_used.to_string()])
                    .collect(),
            ))
        };

        Self {
            code: wo.code.clone(),
            title: t_in(locale, "document.title"),
            details,
            dates,
            description,
            maintainers,
            parts,
            signature: t_in(locale, "document.signature"),
            footer: t_in(locale, "document.footer"),
            locale: locale.to_string(),
        }
    }

    /// 正文行（未分页）
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(self.title.to_uppercase());
        lines.push("=".repeat(self.title.chars().count()));
        lines.push(String::new());

        lines.extend(self.details.render());
        lines.push(String::new());
        lines.extend(self.dates.render());
        lines.push(String::new());

        if let Some((heading, text)) = &self.description {
            lines.push(heading.clone());
            lines.extend(wrap_text(text, DESCRIPTION_WIDTH));
            lines.push(String::new());
        }
        if let Some(table) = &self.maintainers {
            lines.extend(table.render());
            lines.push(String::new());
        }
        if let Some(table) = &self.parts {
            lines.extend(table.render());
            lines.push(String::new());
        }

        lines.push(String::new());
        lines.push("_".repeat(SIGNATURE_LINE_WIDTH));
        lines.push(self.signature.clone());
        lines
    }

    /// 按页高切分，每页末尾附页脚与页码
    pub fn render_pages(&self, page_height: usize) -> Vec<String> {
        let page_height = page_height.max(1);
        let body = self.body_lines();
        let total = body.len().div_ceil(page_height).max(1);

        body.chunks(page_height)
            .enumerate()
            .map(|(idx, chunk)| {
                let mut page: Vec<String> = chunk.to_vec();
                // 末页补空行，页脚位置固定
                page.resize(page_height, String::new());
                page.push(String::new());
                page.push(self.footer.clone());
                let page_no = (idx + 1).to_string();
                let total_pages = total.to_string();
                page.push(t_in_with_args(
                    &self.locale,
                    "document.page",
                    &[("page", page_no.as_str()), ("total", total_pages.as_str())],
                ));
                page.join("\n")
            })
            .collect()
    }

    pub fn render(&self, page_height: usize) -> String {
        let separator = format!("\n{}", PAGE_BREAK);
        let mut text = self.render_pages(page_height).join(&separator);
        text.push('\n');
        text
    }

    pub fn file_name(&self) -> String {
        document_file_name(&self.code)
    }

    /// 写入目录，返回完整路径
    pub fn write_to_dir(&self, dir: &Path, page_height: usize) -> ExportResult<std::path::PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render(page_height))?;
        tracing::info!(path = %path.display(), code = %self.code, "工单文档已生成");
        Ok(path)
    }
}

/// 文档文件名: OS_{工单号}.txt
///
/// 路径分隔符替换为 `_`，文件始终落在目标目录内
pub fn document_file_name(code: &str) -> String {
    let safe: String = code
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("OS_{}.txt", safe)
}

/// 按词换行；超长单词单独成行
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
