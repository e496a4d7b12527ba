// ==========================================
// CSV 导入工作簿 - 命令行宿主
// ==========================================
// 用法:
//   sheet-importer <picked.json> [db_path] [drive_root] [--json] [--json-log] [--locale <code>]
//
// picked.json 为文件选择器返回的文档列表: [{id, name, mimeType, url}]
// 默认输出 HTML 报告，--json 输出完整响应；--json-log 以 JSON 格式输出日志
// 批次未完整执行时退出码为 1
// ==========================================

use anyhow::{bail, Context};
use sheet_importer::app::{get_default_db_path, get_default_drive_root, AppState};
use sheet_importer::domain::FileDescriptor;
use sheet_importer::i18n::{set_locale, t, t_with_args};
use std::path::PathBuf;

struct CliArgs {
    picked_path: PathBuf,
    db_path: Option<String>,
    drive_root: Option<PathBuf>,
    json: bool,
    json_log: bool,
    locale: Option<String>,
}

/// 解析命令行参数
///
/// # 返回
/// - Ok(None): 请求帮助信息
/// - Ok(Some(CliArgs)): 参数完整
fn parse_args<I>(args: I) -> anyhow::Result<Option<CliArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut json = false;
    let mut json_log = false;
    let mut locale = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--json-log" => json_log = true,
            "--locale" => {
                locale = Some(args.next().context("--locale 缺少参数")?);
            }
            "-h" | "--help" => return Ok(None),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let picked_path = match positional.next() {
        Some(path) => PathBuf::from(path),
        None => bail!(t("cli.usage")),
    };

    Ok(Some(CliArgs {
        picked_path,
        db_path: positional.next(),
        drive_root: positional.next().map(PathBuf::from),
        json,
        json_log,
        locale,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Some(args) => args,
        None => {
            println!("{}", t("cli.usage"));
            return Ok(());
        }
    };

    if args.json_log {
        sheet_importer::logging::init_json();
    } else {
        sheet_importer::logging::init();
    }
    if let Some(locale) = &args.locale {
        set_locale(locale);
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", sheet_importer::APP_NAME, sheet_importer::VERSION);
    tracing::info!("==================================================");

    let picked = tokio::fs::read_to_string(&args.picked_path)
        .await
        .with_context(|| {
            let path = args.picked_path.to_string_lossy();
            t_with_args("cli.read_failed", &[("path", path.as_ref())])
        })?;
    let files: Vec<FileDescriptor> =
        serde_json::from_str(&picked).context("无法解析所选文件列表")?;

    let db_path = args.db_path.unwrap_or_else(get_default_db_path);
    let drive_root = args.drive_root.unwrap_or_else(get_default_drive_root);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("云盘根目录: {}", drive_root.display());

    let state = AppState::new(db_path, drive_root).map_err(anyhow::Error::msg)?;
    let response = state.import_api.load_selected_files(files).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.html);
    }

    let summary = &response.summary;
    let imported = (summary.imported + summary.renamed).to_string();
    let renamed = summary.renamed.to_string();
    let rejected = summary.rejected().to_string();
    eprintln!(
        "{}",
        t_with_args(
            "cli.finished",
            &[
                ("imported", imported.as_str()),
                ("renamed", renamed.as_str()),
                ("rejected", rejected.as_str()),
            ],
        )
    );

    if !response.is_complete() {
        std::process::exit(1);
    }
    Ok(())
}
