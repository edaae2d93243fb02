use sea_orm::{EntityTrait, PaginatorTrait};

use registrar_server::entity::{course, student};

use crate::common::{TestApp, find_row, routes};

mod add {
    use super::*;

    #[tokio::test]
    async fn added_course_can_be_looked_up_by_code() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app
            .post_form(
                routes::ADD_COURSES,
                &[
                    ("course_code", "CS101"),
                    ("course_name", "Intro to CS"),
                    ("resp_college", "CAS"),
                ],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.flash(), "Course Added Successfully!");
        assert_eq!(res.body["options"]["colleges"], serde_json::json!(["CAS"]));
        let row = find_row(&res.body["courses"], "course_code", "CS101").unwrap();
        assert_eq!(row["course_name"], "Intro to CS");
        assert_eq!(row["resp_college"], "CAS");
        assert_eq!(row["edit_path"], "/test1/CS101");
    }

    #[tokio::test]
    async fn form_offers_existing_colleges() {
        let app = TestApp::spawn().await;
        app.add_college("COE", "Engineering").await;
        app.add_college("CAS", "Arts and Sciences").await;

        let res = app.get(routes::ADD_COURSES).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body["options"]["colleges"],
            serde_json::json!(["CAS", "COE"])
        );
    }

    #[tokio::test]
    async fn listing_is_grouped_by_college() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_college("COE", "Engineering").await;
        app.add_course("AA100", "Circuits One", "COE").await;
        app.add_course("ZZ900", "Intro to CS", "CAS").await;

        let res = app.get(routes::ADD_COURSES).await;

        let codes: Vec<&str> = res.body["courses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["course_code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["ZZ900", "AA100"]);
    }

    #[tokio::test]
    async fn unknown_college_is_not_a_valid_choice() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::ADD_COURSES,
                &[
                    ("course_code", "CS101"),
                    ("course_name", "Intro to CS"),
                    ("resp_college", "NOPE"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_fields(), vec!["resp_college"]);
        assert_eq!(res.body["errors"][0]["message"], "Not a valid choice.");
        assert_eq!(res.body["flash"]["level"], "error");
        assert_eq!(course::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected_and_count_unchanged() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_course("CS101", "Intro to CS", "CAS").await;

        let res = app
            .post_form(
                routes::ADD_COURSES,
                &[
                    ("course_code", "CS101"),
                    ("course_name", "Something Else"),
                    ("resp_college", "CAS"),
                ],
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.flash(), "Course already exists!");
        assert_eq!(course::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleting_a_course_clears_course_of_its_students() {
        let app = TestApp::spawn().await;
        app.seed_enrolment().await;

        let res = app
            .post_form(routes::DELETE_COURSES, &[("course_code", "CS101")])
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["removed"], true);
        assert_eq!(res.flash(), "Course Removed Successfully!");

        let student = student::Entity::find_by_id("2021-0001".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .expect("student should survive its course");
        assert_eq!(student.course, None);
    }

    #[tokio::test]
    async fn deleting_an_unknown_code_removes_nothing() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_course("CS101", "Intro to CS", "CAS").await;

        let res = app
            .post_form(routes::DELETE_COURSES, &[("course_code", "NOPE")])
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["removed"], false);
        assert_eq!(course::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn new_code_cascades_into_students() {
        let app = TestApp::spawn().await;
        app.seed_enrolment().await;

        let res = app
            .post_form(
                &routes::edit_course("CS101"),
                &[
                    ("course_code", "CS111"),
                    ("course_name", "Intro to Computing"),
                    ("resp_college", "CAS"),
                ],
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.flash(), "Course Updated Successfully!");
        assert_eq!(res.body["record"]["course_code"], "CS111");

        let student = student::Entity::find_by_id("2021-0001".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.course.as_deref(), Some("CS111"));
    }

    #[tokio::test]
    async fn college_can_be_reassigned() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_college("COE", "Engineering").await;
        app.add_course("CS101", "Intro to CS", "CAS").await;

        let res = app
            .post_form(
                &routes::edit_course("CS101"),
                &[
                    ("course_code", "CS101"),
                    ("course_name", "Intro to CS"),
                    ("resp_college", "COE"),
                ],
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let stored = course::Entity::find_by_id("CS101".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.resp_college.as_deref(), Some("COE"));
    }

    #[tokio::test]
    async fn updating_a_missing_course_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                &routes::edit_course("NOPE"),
                &[
                    ("course_code", "NOPE"),
                    ("course_name", "Nothing Here"),
                    ("resp_college", "CAS"),
                ],
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn taking_another_courses_code_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_course("CS101", "Intro to CS", "CAS").await;
        app.add_course("CS102", "Data Structures", "CAS").await;

        let res = app
            .post_form(
                &routes::edit_course("CS102"),
                &[
                    ("course_code", "CS101"),
                    ("course_name", "Data Structures"),
                    ("resp_college", "CAS"),
                ],
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(
            res.flash(),
            "Course Update Failed! Course code already exists!"
        );
        assert_eq!(course::Entity::find().count(&app.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn edit_form_of_an_orphaned_course_has_empty_college() {
        let app = TestApp::spawn().await;
        app.add_college("CAS", "Arts and Sciences").await;
        app.add_course("CS101", "Intro to CS", "CAS").await;
        app.post_form(routes::DELETE_COLLEGES, &[("college_code", "CAS")])
            .await;

        let res = app.get(&routes::edit_course("CS101")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["record"]["resp_college"], serde_json::Value::Null);
        assert_eq!(res.body["form"]["resp_college"], "");

        let list = app.get(routes::UPDATE_COURSES).await;
        assert_eq!(list.body["courses"][0]["edit_path"], "/test1/CS101");
    }
}
