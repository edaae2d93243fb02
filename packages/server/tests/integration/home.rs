use crate::common::{TestApp, routes};

#[tokio::test]
async fn dashboard_of_an_empty_database_has_three_empty_tables() {
    let app = TestApp::spawn().await;

    let body = app.home().await;

    assert_eq!(body["students"], serde_json::json!([]));
    assert_eq!(body["courses"], serde_json::json!([]));
    assert_eq!(body["colleges"], serde_json::json!([]));
}

#[tokio::test]
async fn dashboard_lists_every_table_ordered_by_key() {
    let app = TestApp::spawn().await;
    app.add_college("COE", "Engineering").await;
    app.add_college("CAS", "Arts and Sciences").await;
    app.add_course("EE101", "Circuits One", "COE").await;
    app.add_course("CS101", "Intro to CS", "CAS").await;
    app.add_student("2021-0002", "Abad", "CS101").await;
    app.add_student("2021-0001", "Zamora", "EE101").await;

    let body = app.home().await;

    assert_eq!(body["colleges"][0]["college_code"], "CAS");
    assert_eq!(body["colleges"][1]["college_code"], "COE");
    assert_eq!(body["courses"][0]["course_code"], "CS101");
    assert_eq!(body["courses"][1]["course_code"], "EE101");
    assert_eq!(body["students"][0]["id"], "2021-0001");
    assert_eq!(body["students"][1]["id"], "2021-0002");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_lists_the_page_routes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = &res.body["paths"];
    for path in ["/", "/add-colleges", "/test1/{course_code}", "/test2/{id}", "/media/{path}"] {
        assert!(paths.get(path).is_some(), "missing {path} in {}", res.text);
    }
}

#[tokio::test]
async fn missing_media_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get("/media/SIS/nothing.png").await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
