// ==========================================
// CSV 导入工作簿 - 文件描述符
// ==========================================
// 职责: 文件选择器返回的单个文件元数据
// 来源: 外部提供（id/name/mimeType/url），核心层只写 sheet_name
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// FileDescriptor - 文件描述符
// ==========================================
// 身份标识 = id
// 缺失的 name/mimeType 反序列化为空字符串，由分类器判为无效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub url: String,

    /// 重名时生成的目标工作表名（仅重命名时设置）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
}

impl FileDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            url: url.into(),
            sheet_name: None,
        }
    }

    /// 导入时使用的工作表名（优先 sheet_name，否则 name）
    pub fn target_sheet_name(&self) -> &str {
        self.sheet_name.as_deref().unwrap_or(&self.name)
    }

    /// 是否因重名被改名
    pub fn is_renamed(&self) -> bool {
        matches!(&self.sheet_name, Some(sheet_name) if sheet_name != &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_sheet_name_defaults_to_name() {
        let file = FileDescriptor::new("f1", "data.csv", "text/csv", "https://drive/f1");
        assert_eq!(file.target_sheet_name(), "data.csv");
        assert!(!file.is_renamed());
    }

    #[test]
    fn test_target_sheet_name_prefers_sheet_name() {
        let mut file = FileDescriptor::new("f1", "data.csv", "text/csv", "https://drive/f1");
        file.sheet_name = Some("data.csv (2)".to_string());
        assert_eq!(file.target_sheet_name(), "data.csv (2)");
        assert!(file.is_renamed());
    }

    #[test]
    fn test_deserialize_picker_document() {
        let json = r#"{
            "id": "1AbC",
            "name": "grades.csv",
            "mimeType": "text/csv",
            "url": "https://drive.google.com/file/d/1AbC/view",
            "sizeBytes": 2048
        }"#;
        let file: FileDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(file.id, "1AbC");
        assert_eq!(file.mime_type, "text/csv");
        assert_eq!(file.sheet_name, None);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let file: FileDescriptor = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(file.name.is_empty());
        assert!(file.mime_type.is_empty());
    }
}
