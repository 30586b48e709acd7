use serde::Serialize;

/// 统一响应信封：HTTP 状态表达传输层结果，code 表达业务结果
#[derive(Debug, Serialize)]
pub struct Response<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            msg: "success".to_string(),
            data: Some(data),
        }
    }
}

impl Response<()> {
    pub fn ok() -> Self {
        Self {
            code: 200,
            msg: "success".to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = Response::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["msg"], "success");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_empty_envelope_omits_data() {
        let resp = Response::ok();
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
    }
}
