// ==========================================
// CSV 导入工作簿 - 文件解析器实现
// ==========================================
// 职责: 文件内容 → 行（字符串单元格）
// 支持: CSV
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_importer_trait::TabularParser;
use csv::ReaderBuilder;

// ==========================================
// CSV Parser 实现
// ==========================================
// 不跳过表头：第 1 行源数据即工作表第 1 行
// 单元格原样保留（不 TRIM）
// 空行保留为空行（csv 读取器会跳过空行，这里按记录起始字节补回）
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularParser for CsvParser {
    fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        // 去除 UTF-8 BOM
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| {
                ImportError::CsvParseError(format!("第 {} 行: {}", rows.len() + 1, e))
            })?;

            // 读取起点为上一条记录的结束位置，其后的行终止符即被跳过的空行
            if let Some(position) = record.position() {
                let blank_lines = leading_blank_lines(bytes, position.byte() as usize);
                rows.extend(std::iter::repeat_with(Vec::new).take(blank_lines));
            }
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(rows)
    }
}

/// 统计 offset 处连续的空行数（\n、\r\n、\r 均视为行终止符）
fn leading_blank_lines(bytes: &[u8], offset: usize) -> usize {
    let mut pos = offset;

    // 上一条记录以 \r\n 结束且 \n 尚未消费
    if pos > 0 && bytes.get(pos - 1) == Some(&b'\r') && bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }

    let mut count = 0;
    loop {
        match bytes.get(pos) {
            Some(b'\n') => pos += 1,
            Some(b'\r') if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
            Some(b'\r') => pos += 1,
            _ => return count,
        }
        count += 1;
    }
}
