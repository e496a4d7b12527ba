// ==========================================
// CSV 导入工作簿 - 导入报告 HTML 视图
// ==========================================
// 职责: 将导入报告渲染为宿主可直接展示的 HTML 片段
// 结构: [中止信息] → 非空分组（固定顺序，每组一个有序列表）→ 结束提示
// 所有插入的文本都经过 HTML 转义
// ==========================================

use crate::api::import_api::ImportFailureInfo;
use crate::domain::{FileDescriptor, ImportCategory, ImportReport};
use crate::i18n::{t, t_with_args};
use std::fmt::Write;

/// 渲染导入报告
///
/// # 参数
/// - report: 导入报告
/// - failure: 批次中止信息（None 表示批次完整执行）
pub fn render_report_html(report: &ImportReport, failure: Option<&ImportFailureInfo>) -> String {
    let mut html = String::from("<div class=\"import-report\">");

    if let Some(failure) = failure {
        render_failure(&mut html, failure);
    }

    for group in report.non_empty_groups() {
        let _ = write!(
            html,
            "<div class=\"{}\"><p>{}</p><ol>",
            group.category.css_class(),
            escape_html(&t(group.category.message_key()))
        );
        for file in &group.files {
            match group.category {
                ImportCategory::Renamed => render_renamed_entry(&mut html, file),
                _ => render_link_entry(&mut html, file),
            }
        }
        html.push_str("</ol></div>");
    }

    let _ = write!(
        html,
        "<p>{}</p><input type=\"button\" value=\"{}\" class=\"btn\"></div>",
        escape_html(&t("report.close_hint")),
        escape_html(&t("report.close_button"))
    );
    html
}

fn render_failure(html: &mut String, failure: &ImportFailureInfo) {
    let file_id = escape_arg(&failure.file_id);
    let message = escape_arg(&failure.message);
    let detail = t_with_args(
        "report.failure_detail",
        &[("file_id", file_id.as_str()), ("message", message.as_str())],
    );
    let _ = write!(
        html,
        "<div class=\"msg msg-error import-failure\"><p>{}</p><p>{}</p>",
        escape_html(&t("report.failure_title")),
        detail
    );

    if !failure.unprocessed.is_empty() {
        let _ = write!(html, "<p>{}</p><ol>", escape_html(&t("report.unprocessed")));
        for file in &failure.unprocessed {
            render_link_entry(html, file);
        }
        html.push_str("</ol>");
    }
    html.push_str("</div>");
}

fn render_link_entry(html: &mut String, file: &FileDescriptor) {
    let _ = write!(
        html,
        "<li><b>{}</b>{}</li>",
        escape_html(&t("report.filename_label")),
        file_link(file)
    );
}

fn render_renamed_entry(html: &mut String, file: &FileDescriptor) {
    let link = guard_placeholders(&file_link(file));
    let sheet = escape_arg(file.target_sheet_name());
    let entry = t_with_args(
        "report.renamed_entry",
        &[("link", link.as_str()), ("sheet", sheet.as_str())],
    );
    let _ = write!(html, "<li>{}</li>", entry);
}

fn file_link(file: &FileDescriptor) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&file.url),
        escape_html(&file.name)
    )
}

/// HTML 转义
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// 占位符替换按参数顺序进行，参数值里的 "%{" 不能被再次替换
fn guard_placeholders(html: &str) -> String {
    html.replace('%', "&#37;")
}

fn escape_arg(input: &str) -> String {
    guard_placeholders(&escape_html(input))
}
