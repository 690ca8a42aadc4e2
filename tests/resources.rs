//! End-to-end reconciler scenarios against a mock control plane.

use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Mock;
use neon_provider::testing::ProviderTester;
use neon_provider::{Client, NeonProvider, PollConfig, ProviderError};
use serde_json::json;

fn tester_for(server: &MockServer) -> ProviderTester<NeonProvider> {
    let client = Client::new("test-token")
        .with_base_url(server.base_url())
        .with_poll_config(PollConfig {
            interval: Duration::from_millis(1),
            max_attempts: 5,
        });
    ProviderTester::new(NeonProvider::with_client(client))
}

fn mock_operations_finished<'a>(server: &'a MockServer, project_id: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/projects/{}/operations", project_id));
        then.status(200).json_body(json!({
            "operations": [
                { "id": "op-1", "status": "finished", "project_id": project_id }
            ]
        }));
    })
}

fn mock_branch_get<'a>(server: &'a MockServer, project_id: &str, branch_id: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/projects/{}/branches/{}", project_id, branch_id));
        then.status(200).json_body(json!({
            "branch": {
                "id": branch_id,
                "project_id": project_id,
                "parent_id": null,
                "name": "preview",
                "default": false,
                "protected": false,
                "current_state": "ready"
            }
        }));
    })
}

fn endpoint_json(id: &str, branch_id: &str, kind: &str) -> serde_json::Value {
    json!({
        "id": id,
        "host": format!("{}.aws.neon.tech", id),
        "branch_id": branch_id,
        "project_id": "cool-project-123",
        "region_id": "aws-us-east-2",
        "autoscaling_limit_min_cu": 0.25,
        "autoscaling_limit_max_cu": 0.25,
        "provisioner": "k8s-pod",
        "suspend_timeout_seconds": 0,
        "type": kind,
        "current_state": "active"
    })
}

#[tokio::test]
async fn project_create_with_defaults_strips_seeded_database_and_role() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let create = server.mock(|when, then| {
        when.method(POST).path("/projects").json_body_partial(
            r#"{
                "project": {
                    "name": "mine",
                    "region_id": "aws-us-east-2",
                    "pg_version": 15,
                    "store_passwords": true,
                    "history_retention_seconds": 86400,
                    "branch": { "name": "main" },
                    "default_endpoint_settings": {
                        "autoscaling_limit_min_cu": 0.25,
                        "autoscaling_limit_max_cu": 0.25,
                        "suspend_timeout_seconds": 0
                    }
                }
            }"#,
        );
        then.status(201).json_body(json!({
            "project": {
                "id": "cool-project-123",
                "name": "mine",
                "platform_id": "aws",
                "region_id": "aws-us-east-2",
                "pg_version": 15,
                "store_passwords": true,
                "history_retention_seconds": 86400
            },
            "branch": {
                "id": "br-quiet-sea",
                "project_id": "cool-project-123",
                "parent_id": null,
                "name": "main",
                "default": true,
                "protected": false,
                "current_state": "init"
            },
            "endpoints": [endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write")],
            "databases": [
                { "id": 1, "branch_id": "br-quiet-sea", "name": "neondb", "owner_name": "neondb_owner" }
            ],
            "roles": [
                { "name": "neondb_owner", "password": "seeded", "branch_id": "br-quiet-sea" }
            ]
        }));
    });
    let _operations = mock_operations_finished(&server, "cool-project-123");
    let delete_database = server.mock(|when, then| {
        when.method(DELETE)
            .path("/projects/cool-project-123/branches/br-quiet-sea/databases/neondb");
        then.status(200).body("{}");
    });
    let delete_role = server.mock(|when, then| {
        when.method(DELETE)
            .path("/projects/cool-project-123/branches/br-quiet-sea/roles/neondb_owner");
        then.status(200).body("{}");
    });

    let state = tester
        .create(
            "neon_project",
            json!({ "name": "mine", "region_id": "aws-us-east-2" }),
        )
        .await
        .unwrap();

    create.assert();
    delete_database.assert();
    delete_role.assert();

    assert_eq!(state["id"], "cool-project-123");
    assert_eq!(state["branch"]["name"], "main");
    assert_eq!(state["branch"]["endpoint"]["id"], "ep-misty-dawn");
    assert_eq!(state["branch"]["endpoint"]["min_cu"], 0.25);
    assert_eq!(state["branch"]["endpoint"]["max_cu"], 0.25);
    assert_eq!(state["branch"]["endpoint"]["compute_provisioner"], "k8s-pod");
}

#[tokio::test]
async fn project_create_protects_branch_when_asked() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    server.mock(|when, then| {
        when.method(POST).path("/projects");
        then.status(201).json_body(json!({
            "project": {
                "id": "cool-project-123",
                "name": "mine",
                "region_id": "aws-us-east-2",
                "pg_version": 15
            },
            "branch": {
                "id": "br-quiet-sea",
                "project_id": "cool-project-123",
                "name": "main",
                "default": true,
                "protected": false
            },
            "endpoints": [endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write")],
            "databases": [
                { "id": 1, "branch_id": "br-quiet-sea", "name": "neondb", "owner_name": "neondb_owner" }
            ],
            "roles": [{ "name": "neondb_owner", "branch_id": "br-quiet-sea" }]
        }));
    });
    let _operations = mock_operations_finished(&server, "cool-project-123");
    let protect = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/branches/br-quiet-sea")
            .json_body(json!({ "branch": { "protected": true } }));
        then.status(200).json_body(json!({
            "branch": {
                "id": "br-quiet-sea",
                "project_id": "cool-project-123",
                "name": "main",
                "default": true,
                "protected": true
            }
        }));
    });
    server.mock(|when, then| {
        when.method(DELETE).path_contains("/databases/");
        then.status(200).body("{}");
    });
    server.mock(|when, then| {
        when.method(DELETE).path_contains("/roles/");
        then.status(200).body("{}");
    });

    let state = tester
        .create(
            "neon_project",
            json!({
                "name": "mine",
                "region_id": "aws-us-east-2",
                "branch": { "protected": true }
            }),
        )
        .await
        .unwrap();

    protect.assert();
    assert_eq!(state["branch"]["protected"], true);
}

#[tokio::test]
async fn project_update_skips_branch_patch_when_nothing_changed() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let update_project = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH).path("/projects/cool-project-123");
        then.status(200).json_body(json!({
            "project": {
                "id": "cool-project-123",
                "name": "renamed",
                "region_id": "aws-us-east-2",
                "pg_version": 15,
                "history_retention_seconds": 86400
            }
        }));
    });
    let update_branch = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/branches/br-quiet-sea");
        then.status(200).body("{}");
    });
    let _operations = mock_operations_finished(&server, "cool-project-123");
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200)
            .json_body(json!({ "endpoint": endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write") }));
    });
    let update_endpoint = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200)
            .json_body(json!({ "endpoint": endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write") }));
    });

    let prior = json!({
        "id": "cool-project-123",
        "name": "mine",
        "region_id": "aws-us-east-2",
        "pg_version": 15,
        "history_retention": 86400,
        "branch": {
            "id": "br-quiet-sea",
            "name": "main",
            "protected": false,
            "endpoint": {
                "id": "ep-misty-dawn",
                "host": "ep-misty-dawn.aws.neon.tech",
                "min_cu": 0.25,
                "max_cu": 0.25,
                "compute_provisioner": "k8s-pod",
                "suspend_timeout": 0
            }
        }
    });
    let planned = json!({
        "name": "renamed",
        "region_id": "aws-us-east-2",
        "branch": { "name": "main", "protected": false }
    });

    let state = tester
        .update("neon_project", prior, planned)
        .await
        .unwrap();

    update_project.assert();
    update_endpoint.assert();
    // The platform rejects a rename to the current name, so no branch
    // PATCH may be issued.
    update_branch.assert_hits(0);

    assert_eq!(state["name"], "renamed");
    assert_eq!(state["branch"]["name"], "main");
}

#[tokio::test]
async fn project_update_renames_branch_when_changed() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    server.mock(|when, then| {
        when.method(httpmock::Method::PATCH).path("/projects/cool-project-123");
        then.status(200).json_body(json!({
            "project": {
                "id": "cool-project-123",
                "name": "mine",
                "region_id": "aws-us-east-2"
            }
        }));
    });
    let rename_branch = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/branches/br-quiet-sea")
            .json_body(json!({ "branch": { "name": "trunk" } }));
        then.status(200).json_body(json!({
            "branch": {
                "id": "br-quiet-sea",
                "project_id": "cool-project-123",
                "name": "trunk",
                "default": true,
                "protected": false
            }
        }));
    });
    let _operations = mock_operations_finished(&server, "cool-project-123");
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200)
            .json_body(json!({ "endpoint": endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write") }));
    });
    server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200)
            .json_body(json!({ "endpoint": endpoint_json("ep-misty-dawn", "br-quiet-sea", "read_write") }));
    });

    let prior = json!({
        "id": "cool-project-123",
        "name": "mine",
        "region_id": "aws-us-east-2",
        "branch": {
            "id": "br-quiet-sea",
            "name": "main",
            "protected": false,
            "endpoint": { "id": "ep-misty-dawn" }
        }
    });
    let planned = json!({
        "name": "mine",
        "region_id": "aws-us-east-2",
        "branch": { "name": "trunk" }
    });

    let state = tester
        .update("neon_project", prior, planned)
        .await
        .unwrap();

    rename_branch.assert();
    assert_eq!(state["branch"]["name"], "trunk");
}

#[tokio::test]
async fn branch_create_provisions_paired_endpoint() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let create_branch = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/branches")
            .json_body(json!({ "branch": { "name": "preview" } }));
        then.status(201).json_body(json!({
            "branch": {
                "id": "br-preview",
                "project_id": "cool-project-123",
                "parent_id": "br-quiet-sea",
                "name": "preview",
                "default": false,
                "protected": false
            }
        }));
    });
    let create_endpoint = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/endpoints")
            .json_body_partial(
                r#"{
                    "endpoint": {
                        "branch_id": "br-preview",
                        "type": "read_write",
                        "provisioner": "k8s-pod",
                        "autoscaling_limit_min_cu": 0.25,
                        "autoscaling_limit_max_cu": 0.25,
                        "suspend_timeout_seconds": 300
                    }
                }"#,
            );
        then.status(201)
            .json_body(json!({ "endpoint": endpoint_json("ep-new", "br-preview", "read_write") }));
    });

    let state = tester
        .create(
            "neon_branch",
            json!({
                "project_id": "cool-project-123",
                "name": "preview",
                "endpoint": {}
            }),
        )
        .await
        .unwrap();

    create_branch.assert();
    create_endpoint.assert();

    assert_eq!(state["id"], "br-preview");
    assert_eq!(state["parent_id"], "br-quiet-sea");
    assert_eq!(state["endpoint"]["id"], "ep-new");
    assert_eq!(state["endpoint"]["host"], "ep-new.aws.neon.tech");
}

#[tokio::test]
async fn branch_create_without_endpoint_issues_single_call() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let create_branch = server.mock(|when, then| {
        when.method(POST).path("/projects/cool-project-123/branches");
        then.status(201).json_body(json!({
            "branch": {
                "id": "br-preview",
                "project_id": "cool-project-123",
                "name": "preview"
            }
        }));
    });
    let create_endpoint = server.mock(|when, then| {
        when.method(POST).path("/projects/cool-project-123/endpoints");
        then.status(201).body("{}");
    });

    let state = tester
        .create(
            "neon_branch",
            json!({ "project_id": "cool-project-123", "name": "preview" }),
        )
        .await
        .unwrap();

    create_branch.assert();
    create_endpoint.assert_hits(0);
    assert!(state.get("endpoint").is_none());
}

#[tokio::test]
async fn branch_update_adds_declared_endpoint() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let create_endpoint = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/endpoints")
            .json_body_partial(
                r#"{
                    "endpoint": {
                        "branch_id": "br-preview",
                        "type": "read_write",
                        "provisioner": "k8s-neonvm",
                        "autoscaling_limit_min_cu": 0.5,
                        "autoscaling_limit_max_cu": 2.0
                    }
                }"#,
            );
        then.status(201).json_body(json!({
            "endpoint": {
                "id": "ep-new",
                "host": "ep-new.aws.neon.tech",
                "branch_id": "br-preview",
                "project_id": "cool-project-123",
                "autoscaling_limit_min_cu": 0.5,
                "autoscaling_limit_max_cu": 2.0,
                "provisioner": "k8s-neonvm",
                "suspend_timeout_seconds": 300,
                "type": "read_write",
                "current_state": "init"
            }
        }));
    });

    let prior = json!({
        "id": "br-preview",
        "project_id": "cool-project-123",
        "name": "preview"
    });
    let planned = json!({
        "project_id": "cool-project-123",
        "name": "preview",
        "endpoint": { "min_cu": 0.5, "max_cu": 2.0 }
    });

    let state = tester.update("neon_branch", prior, planned).await.unwrap();

    create_endpoint.assert();
    assert_eq!(state["endpoint"]["compute_provisioner"], "k8s-neonvm");
    assert_eq!(state["endpoint"]["min_cu"], 0.5);
}

#[tokio::test]
async fn branch_update_deletes_undeclared_endpoint() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let delete_endpoint = server.mock(|when, then| {
        when.method(DELETE)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200).body("{}");
    });

    let prior = json!({
        "id": "br-preview",
        "project_id": "cool-project-123",
        "name": "preview",
        "endpoint": { "id": "ep-misty-dawn", "min_cu": 0.25, "max_cu": 0.25 }
    });
    let planned = json!({
        "project_id": "cool-project-123",
        "name": "preview"
    });

    let state = tester.update("neon_branch", prior, planned).await.unwrap();

    delete_endpoint.assert();
    assert!(state.get("endpoint").is_none());
}

#[tokio::test]
async fn branch_delete_never_cascades_to_endpoint() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let delete_branch = server.mock(|when, then| {
        when.method(DELETE)
            .path("/projects/cool-project-123/branches/br-preview");
        then.status(200).body("{}");
    });
    let delete_endpoint = server.mock(|when, then| {
        when.method(DELETE)
            .path("/projects/cool-project-123/endpoints/ep-misty-dawn");
        then.status(200).body("{}");
    });

    tester
        .delete(
            "neon_branch",
            json!({
                "id": "br-preview",
                "project_id": "cool-project-123",
                "name": "preview",
                "endpoint": { "id": "ep-misty-dawn" }
            }),
        )
        .await
        .unwrap();

    // Dropping the endpoint is only ever an explicit update transition;
    // deleting the branch must not touch it.
    delete_branch.assert();
    delete_endpoint.assert_hits(0);
}

#[tokio::test]
async fn branch_update_with_unchanged_name_issues_no_rename() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let rename = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/branches/br-preview");
        then.status(200).body("{}");
    });

    let prior = json!({
        "id": "br-preview",
        "project_id": "cool-project-123",
        "name": "preview"
    });
    let planned = json!({
        "project_id": "cool-project-123",
        "name": "preview"
    });

    let state = tester.update("neon_branch", prior, planned).await.unwrap();

    rename.assert_hits(0);
    assert_eq!(state["name"], "preview");
}

#[tokio::test]
async fn branch_read_rejects_foreign_project() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/branches/br-preview");
        then.status(200).json_body(json!({
            "branch": {
                "id": "br-preview",
                "project_id": "other-project",
                "name": "preview"
            }
        }));
    });

    let err = tester
        .read(
            "neon_branch",
            json!({ "id": "br-preview", "project_id": "cool-project-123" }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Consistency(_)));
    assert!(format!("{}", err).contains("other-project"));
}

#[tokio::test]
async fn standalone_endpoint_is_read_only() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _operations = mock_operations_finished(&server, "cool-project-123");
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/endpoints")
            .json_body_partial(r#"{ "endpoint": { "type": "read_only" } }"#);
        then.status(201).json_body(json!({
            "endpoint": endpoint_json("ep-reader", "br-quiet-sea", "read_only")
        }));
    });

    let state = tester
        .create(
            "neon_endpoint",
            json!({ "project_id": "cool-project-123", "branch_id": "br-quiet-sea" }),
        )
        .await
        .unwrap();

    create.assert();
    assert_eq!(state["type"], "read_only");
    assert_eq!(state["id"], "ep-reader");
}

#[tokio::test]
async fn endpoint_create_rejects_inverted_cu_range() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let err = tester
        .create(
            "neon_endpoint",
            json!({
                "project_id": "cool-project-123",
                "branch_id": "br-quiet-sea",
                "min_cu": 2.0,
                "max_cu": 0.25
            }),
        )
        .await
        .unwrap_err();

    // Rejected before any request is issued.
    assert!(matches!(err, ProviderError::Configuration(_)));
}

#[tokio::test]
async fn database_create_then_read_returns_same_fields() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _branch = mock_branch_get(&server, "cool-project-123", "br-quiet-sea");
    let _operations = mock_operations_finished(&server, "cool-project-123");
    server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/branches/br-quiet-sea/databases")
            .json_body(json!({ "database": { "name": "appdb", "owner_name": "app_owner" } }));
        then.status(201).json_body(json!({
            "database": { "id": 7, "branch_id": "br-quiet-sea", "name": "appdb", "owner_name": "app_owner" }
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/branches/br-quiet-sea/databases/appdb");
        then.status(200).json_body(json!({
            "database": { "id": 7, "branch_id": "br-quiet-sea", "name": "appdb", "owner_name": "app_owner" }
        }));
    });

    let spec = json!({
        "project_id": "cool-project-123",
        "branch_id": "br-quiet-sea",
        "name": "appdb",
        "owner_name": "app_owner"
    });

    let created = tester.create("neon_database", spec).await.unwrap();
    let read = tester
        .read("neon_database", created.clone())
        .await
        .unwrap();

    assert_eq!(created, read);
    assert_eq!(created["id"], 7);
}

#[tokio::test]
async fn database_rename_patches_prior_name() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _branch = mock_branch_get(&server, "cool-project-123", "br-quiet-sea");
    let _operations = mock_operations_finished(&server, "cool-project-123");
    let rename = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/projects/cool-project-123/branches/br-quiet-sea/databases/olddb")
            .json_body(json!({ "database": { "name": "newdb", "owner_name": "app_owner" } }));
        then.status(200).json_body(json!({
            "database": { "id": 7, "branch_id": "br-quiet-sea", "name": "newdb", "owner_name": "app_owner" }
        }));
    });

    let prior = json!({
        "id": 7,
        "project_id": "cool-project-123",
        "branch_id": "br-quiet-sea",
        "name": "olddb",
        "owner_name": "app_owner"
    });
    let planned = json!({
        "project_id": "cool-project-123",
        "branch_id": "br-quiet-sea",
        "name": "newdb",
        "owner_name": "app_owner"
    });

    let state = tester
        .update("neon_database", prior, planned)
        .await
        .unwrap();

    rename.assert();
    assert_eq!(state["name"], "newdb");
}

#[tokio::test]
async fn role_create_captures_generated_password() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _branch = mock_branch_get(&server, "cool-project-123", "br-quiet-sea");
    let _operations = mock_operations_finished(&server, "cool-project-123");
    server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/branches/br-quiet-sea/roles")
            .json_body(json!({ "role": { "name": "app_owner" } }));
        then.status(201).json_body(json!({
            "role": { "name": "app_owner", "password": "generated-secret", "branch_id": "br-quiet-sea" }
        }));
    });

    let state = tester
        .create(
            "neon_role",
            json!({
                "project_id": "cool-project-123",
                "branch_id": "br-quiet-sea",
                "name": "app_owner"
            }),
        )
        .await
        .unwrap();

    assert_eq!(state["password"], "generated-secret");
    assert_eq!(state["id"], "app_owner");
    assert_eq!(state["project_id"], "cool-project-123");
}

#[tokio::test]
async fn role_read_reveals_stored_password() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let _branch = mock_branch_get(&server, "cool-project-123", "br-quiet-sea");
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/branches/br-quiet-sea/roles/app_owner");
        then.status(200).json_body(json!({
            "role": { "name": "app_owner", "branch_id": "br-quiet-sea" }
        }));
    });
    let reveal = server.mock(|when, then| {
        when.method(GET).path(
            "/projects/cool-project-123/branches/br-quiet-sea/roles/app_owner/reveal_password",
        );
        then.status(200).json_body(json!({ "password": "s3cret" }));
    });

    let state = tester
        .read(
            "neon_role",
            json!({
                "id": "app_owner",
                "name": "app_owner",
                "project_id": "cool-project-123",
                "branch_id": "br-quiet-sea"
            }),
        )
        .await
        .unwrap();

    reveal.assert();
    assert_eq!(state["password"], "s3cret");
}

#[tokio::test]
async fn role_update_is_a_noop() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let prior = json!({
        "id": "app_owner",
        "name": "app_owner",
        "password": "s3cret",
        "project_id": "cool-project-123",
        "branch_id": "br-quiet-sea"
    });

    let state = tester
        .update("neon_role", prior.clone(), json!({}))
        .await
        .unwrap();

    // No mocks were registered: the no-op update must not touch the API.
    assert_eq!(state, prior);
}

#[tokio::test]
async fn connection_uri_reads_direct_and_pooled() {
    let server = MockServer::start();
    let tester = tester_for(&server);

    let direct = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/connection_uri")
            .query_param("pooled", "false")
            .query_param("database_name", "appdb")
            .query_param("role_name", "app_owner");
        then.status(200)
            .json_body(json!({ "uri": "postgres://direct" }));
    });
    let pooled = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/cool-project-123/connection_uri")
            .query_param("pooled", "true");
        then.status(200)
            .json_body(json!({ "uri": "postgres://pooled" }));
    });

    let state = tester
        .read_data_source(
            "neon_connection_uri",
            json!({
                "project_id": "cool-project-123",
                "database_name": "appdb",
                "role_name": "app_owner"
            }),
        )
        .await
        .unwrap();

    direct.assert();
    pooled.assert();
    assert_eq!(state["uri"], "postgres://direct");
    assert_eq!(state["pooled_uri"], "postgres://pooled");
    assert_eq!(state["id"], "cool-project-123:::appdb:app_owner");
}

#[tokio::test]
async fn configure_builds_client_from_provider_block() {
    let server = MockServer::start();
    let tester = ProviderTester::new(NeonProvider::new());

    tester
        .configure(json!({ "token": "test-token", "base_url": server.base_url() }))
        .await
        .unwrap();

    let _branch = mock_branch_get(&server, "cool-project-123", "br-quiet-sea");
    let _operations = mock_operations_finished(&server, "cool-project-123");
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/cool-project-123/branches/br-quiet-sea/databases")
            .header("Authorization", "Bearer test-token");
        then.status(201).json_body(json!({
            "database": { "id": 1, "branch_id": "br-quiet-sea", "name": "appdb", "owner_name": "app_owner" }
        }));
    });

    let state = tester
        .create(
            "neon_database",
            json!({
                "project_id": "cool-project-123",
                "branch_id": "br-quiet-sea",
                "name": "appdb",
                "owner_name": "app_owner"
            }),
        )
        .await
        .unwrap();

    create.assert();
    assert_eq!(state["name"], "appdb");
}
