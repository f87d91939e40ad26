// ABOUTME: Test helper utilities for mocking pixiv API responses and server
// ABOUTME: Provides mockito-based helpers for unit testing API interactions

#[cfg(test)]
use mockito::{Server, ServerGuard};
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
pub async fn mock_pixiv_server() -> ServerGuard {
    Server::new_async().await
}

#[cfg(test)]
pub fn mock_illust_response() -> serde_json::Value {
    json!({
        "error": false,
        "message": "",
        "body": {
            "illustId": "92065303",
            "illustTitle": "夕暮れ",
            "illustComment": "first line<br />second line",
            "userId": "1234",
            "userName": "artist",
            "width": 5000,
            "height": 3000,
            "pageCount": 1,
            "urls": {
                "mini": "https://i.pximg.net/c/48x48/img-master/img/2021/08/28/00/00/00/92065303_p0_square1200.jpg",
                "thumb": "https://i.pximg.net/c/250x250_80_a2/img-master/img/2021/08/28/00/00/00/92065303_p0_square1200.jpg",
                "small": "https://i.pximg.net/c/540x540_70/img-master/img/2021/08/28/00/00/00/92065303_p0_master1200.jpg",
                "regular": "https://i.pximg.net/img-master/img/2021/08/28/00/00/00/92065303_p0_master1200.jpg",
                "original": "https://i.pximg.net/img-original/img/2021/08/28/00/00/00/92065303_p0.png"
            },
            "tags": {
                "tags": [
                    { "tag": "風景", "translation": { "en": "scenery" } },
                    { "tag": "オリジナル" }
                ]
            }
        }
    })
}

#[cfg(test)]
pub fn mock_error_response(message: &str) -> serde_json::Value {
    json!({
        "error": true,
        "message": message,
        "body": []
    })
}
