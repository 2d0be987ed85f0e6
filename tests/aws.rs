use convoy::aws::cli::{
    parse_environment, parse_environments, parse_load_balancer_arn, parse_security_group,
    parse_target_group,
};
use convoy::error::ConvoyError;
use convoy::{AwsCli, EnvStatus};

#[test]
fn status_parse_known_values() {
    assert_eq!(EnvStatus::parse("Launching"), EnvStatus::Launching);
    assert_eq!(EnvStatus::parse("Updating"), EnvStatus::Updating);
    assert_eq!(EnvStatus::parse("Ready"), EnvStatus::Ready);
    assert_eq!(EnvStatus::parse("Terminating"), EnvStatus::Terminating);
    assert_eq!(EnvStatus::parse("Terminated"), EnvStatus::Terminated);
}

#[test]
fn status_parse_carries_unknown_values() {
    assert_eq!(
        EnvStatus::parse("Aborting"),
        EnvStatus::Other("Aborting".to_string())
    );
}

#[test]
fn status_terminated_predicate() {
    assert!(EnvStatus::Terminated.is_terminated());
    assert!(!EnvStatus::Terminating.is_terminated());
    assert!(!EnvStatus::Ready.is_terminated());
}

#[test]
fn status_display_round_trips() {
    for status in ["Launching", "Updating", "Ready", "Terminating", "Terminated"] {
        assert_eq!(EnvStatus::parse(status).to_string(), status);
    }
}

#[test]
fn parse_describe_environments_response() {
    let json = r#"{
        "Environments": [
            {
                "EnvironmentName": "myapp-blue",
                "EnvironmentId": "e-abcd1234",
                "ApplicationName": "myapp",
                "SolutionStackName": "64bit Amazon Linux 2 v4.0.0 running Docker",
                "CNAME": "myapp.ap-northeast-2.elasticbeanstalk.com",
                "Status": "Ready",
                "Health": "Green"
            },
            {
                "EnvironmentName": "myapp-green",
                "CNAME": "myapp-swap.ap-northeast-2.elasticbeanstalk.com",
                "Status": "Launching"
            }
        ]
    }"#;

    let envs = parse_environments(json).unwrap();

    assert_eq!(envs.len(), 2);
    assert_eq!(envs[0].name, "myapp-blue");
    assert_eq!(envs[0].cname, "myapp.ap-northeast-2.elasticbeanstalk.com");
    assert_eq!(envs[0].status, EnvStatus::Ready);
    assert_eq!(envs[1].status, EnvStatus::Launching);
}

#[test]
fn parse_empty_environments_response() {
    let envs = parse_environments(r#"{"Environments": []}"#).unwrap();
    assert!(envs.is_empty());

    let envs = parse_environments("{}").unwrap();
    assert!(envs.is_empty());
}

#[test]
fn parse_create_environment_response() {
    let json = r#"{
        "EnvironmentName": "myapp-green",
        "EnvironmentId": "e-xyz",
        "Status": "Launching"
    }"#;

    let env = parse_environment(json).unwrap();

    assert_eq!(env.name, "myapp-green");
    assert_eq!(env.cname, "");
    assert_eq!(env.status, EnvStatus::Launching);
}

#[test]
fn parse_environment_resources_load_balancer() {
    let json = r#"{
        "EnvironmentResources": {
            "EnvironmentName": "myapp-green",
            "LoadBalancers": [
                {"Name": "arn:aws:elasticloadbalancing:lb/app/myapp/abc"}
            ]
        }
    }"#;

    let arn = parse_load_balancer_arn(json).unwrap();

    assert_eq!(arn, "arn:aws:elasticloadbalancing:lb/app/myapp/abc");
}

#[test]
fn missing_load_balancer_is_an_api_error() {
    let json = r#"{"EnvironmentResources": {"LoadBalancers": []}}"#;

    let err = parse_load_balancer_arn(json).unwrap_err();

    assert!(matches!(err, ConvoyError::AwsApi(_)));
}

#[test]
fn parse_load_balancer_security_group() {
    let json = r#"{
        "LoadBalancers": [
            {
                "LoadBalancerArn": "arn:aws:elasticloadbalancing:lb/app/myapp/abc",
                "SecurityGroups": ["sg-0abc123", "sg-0def456"]
            }
        ]
    }"#;

    assert_eq!(parse_security_group(json).unwrap(), "sg-0abc123");
}

#[test]
fn parse_target_group_arn() {
    let json = r#"{
        "TargetGroups": [
            {"TargetGroupArn": "arn:aws:elasticloadbalancing:targetgroup/myapp/def"}
        ]
    }"#;

    assert_eq!(
        parse_target_group(json).unwrap(),
        "arn:aws:elasticloadbalancing:targetgroup/myapp/def"
    );
}

#[test]
fn cli_defaults() {
    let aws = AwsCli::new();

    assert!(aws.profile.is_none());
    assert_eq!(aws.region, "ap-northeast-2");
    assert_eq!(aws.solution_stack, "64bit Amazon Linux 2 v4.0.0 running Docker");
}

#[test]
fn cli_builder_chain() {
    let aws = AwsCli::new()
        .profile("eb-deploy-base")
        .region("eu-west-1")
        .solution_stack("64bit Amazon Linux 2023 v4.3.1 running Docker");

    assert_eq!(aws.profile.as_deref(), Some("eb-deploy-base"));
    assert_eq!(aws.region, "eu-west-1");
    assert_eq!(aws.solution_stack, "64bit Amazon Linux 2023 v4.3.1 running Docker");
}

#[test]
fn deploy_env_exports_region_and_profile() {
    let aws = AwsCli::new().profile("eb-deploy-base").region("eu-west-1");

    let envs = aws.deploy_env();

    assert!(envs.contains(&("AWS_DEFAULT_REGION".to_string(), "eu-west-1".to_string())));
    assert!(envs.contains(&("AWS_PROFILE".to_string(), "eb-deploy-base".to_string())));
}

#[test]
fn deploy_env_without_profile() {
    let envs = AwsCli::new().deploy_env();

    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].0, "AWS_DEFAULT_REGION");
}
