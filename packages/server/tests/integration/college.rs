use sea_orm::{EntityTrait, PaginatorTrait};

use registrar_server::entity::{college, course};

use crate::common::{TestApp, find_row, routes};

mod add {
    use super::*;

    #[tokio::test]
    async fn added_college_can_be_looked_up_by_code() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "CAS"), ("college_name", "Arts and Sciences")],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.flash(), "College Added Successfully!");
        assert_eq!(res.body["form"]["college_code"], "");
        let row = find_row(&res.body["colleges"], "college_code", "CAS").unwrap();
        assert_eq!(row["college_name"], "Arts and Sciences");
        assert_eq!(row["edit_path"], "/test/CAS");

        let stored = college::Entity::find_by_id("CAS".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.college_name, "Arts and Sciences");
    }

    #[tokio::test]
    async fn values_are_trimmed_before_storing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "  CAS "), ("college_name", " Arts and Sciences ")],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let stored = college::Entity::find_by_id("CAS".to_string())
            .one(&app.db)
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected_and_count_unchanged() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "CAS"), ("college_name", "Another College")],
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.flash(), "College already exists!");
        assert_eq!(res.body["form"]["college_name"], "Another College");
        assert_eq!(college::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "CAS2"), ("college_name", "Arts and Sciences")],
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(college::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn short_name_is_a_field_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "CAS"), ("college_name", "Arts")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["college_name"]);
        assert_eq!(
            res.body["errors"][0]["message"],
            "Field must be between 7 and 64 characters long."
        );
        assert_eq!(res.body["flash"]["level"], "error");
        assert_eq!(res.flash(), "Please correct the highlighted fields.");
        assert_eq!(college::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_per_field() {
        let app = TestApp::spawn().await;

        let res = app.post_form(routes::ADD_COLLEGES, &[]).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["college_code", "college_name"]);
    }

    #[tokio::test]
    async fn code_with_a_slash_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[("college_code", "CA/S"), ("college_name", "Arts and Sciences")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["college_code"]);
    }

    #[tokio::test]
    async fn unknown_form_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COLLEGES,
                &[
                    ("college_code", "CAS"),
                    ("college_name", "Arts and Sciences"),
                    ("dean", "Someone"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(college::Entity::find().count(&app.db).await.unwrap(), 0);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleting_a_college_clears_resp_college_of_its_courses() {
        let app = TestApp::spawn().await;
        app.seed_enrolment().await;

        let res = app
            .post_form(routes::DELETE_COLLEGES, &[("college_code", "CAS")])
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["removed"], true);
        assert_eq!(res.flash(), "College Removed Successfully!");
        assert_eq!(res.body["colleges"], serde_json::json!([]));

        let course = course::Entity::find_by_id("CS101".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .expect("course should survive its college");
        assert_eq!(course.resp_college, None);

        let home = app.home().await;
        let student = find_row(&home["students"], "id", "2021-0001").unwrap();
        assert_eq!(student["course"], "CS101");
    }

    #[tokio::test]
    async fn deleting_an_unknown_code_removes_nothing() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app
            .post_form(routes::DELETE_COLLEGES, &[("college_code", "NOPE")])
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["removed"], false);
        assert_eq!(res.body["flash"]["level"], "info");
        assert_eq!(college::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_code_is_a_field_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::DELETE_COLLEGES, &[("college_code", " ")])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["college_code"]);
    }

    #[tokio::test]
    async fn delete_form_lists_colleges() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app.get(routes::DELETE_COLLEGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["colleges"][0]["college_code"], "CAS");
        assert!(res.body.get("removed").is_none());
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn edit_form_is_prefilled_with_the_stored_row() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app.get(&routes::edit_college("CAS")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["record"]["college_code"], "CAS");
        assert_eq!(res.body["form"]["college_name"], "Arts and Sciences");
    }

    #[tokio::test]
    async fn edit_form_of_a_missing_college_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::edit_college("NOPE")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_list_links_to_edit_forms() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app.get(routes::UPDATE_COLLEGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["colleges"][0]["edit_path"], "/test/CAS");
    }

    #[tokio::test]
    async fn new_code_cascades_into_courses() {
        let app = TestApp::spawn().await;
        app.seed_enrolment().await;
        app.add_course("CS102", "Data Structures", "CAS").await;

        let res = app
            .post_form(
                &routes::edit_college("CAS"),
                &[("college_code", "CCS"), ("college_name", "Computer Studies")],
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.flash(), "College Updated Successfully!");
        assert_eq!(res.body["record"]["college_code"], "CCS");
        assert_eq!(res.body["record"]["edit_path"], "/test/CCS");

        let courses = course::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(courses.len(), 2);
        assert!(
            courses
                .iter()
                .all(|c| c.resp_college.as_deref() == Some("CCS"))
        );
        assert!(
            college::Entity::find_by_id("CAS".to_string())
                .one(&app.db)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn updating_a_missing_college_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                &routes::edit_college("NOPE"),
                &[("college_code", "NOPE"), ("college_name", "Nowhere College")],
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn taking_another_colleges_code_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_college("COE", "Engineering").await;

        let res = app
            .post_form(
                &routes::edit_college("COE"),
                &[("college_code", "CAS"), ("college_name", "Engineering")],
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(
            res.flash(),
            "College Update Failed! College code or name already exists!"
        );
        assert_eq!(res.body["record"]["college_code"], "COE");
        let stored = college::Entity::find_by_id("COE".to_string())
            .one(&app.db)
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn invalid_update_changes_nothing() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app
            .post_form(
                &routes::edit_college("CAS"),
                &[("college_code", "CAS"), ("college_name", "")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["college_name"]);
        let stored = college::Entity::find_by_id("CAS".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.college_name, "Arts and Sciences");
    }
}
