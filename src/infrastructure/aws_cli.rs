//! AWS provider backed by the `aws` command line client
//!
//! Each port operation is one `aws` invocation with `--output json`; the
//! response is decoded with serde. The client resolves credentials itself,
//! so vaws never handles keys.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::domain::entities::{IngressPermission, InstanceCatalogEntry, SecurityRule};
use crate::domain::ports::{
    InstanceCatalog, NetworkInventory, ObjectStorage, ProviderContext, SecurityRules,
};
use crate::error::{VawsError, VawsResult};
use crate::infrastructure::process::ensure_command_exists;

/// Provider error code for an image id that does not exist.
const IMAGE_NOT_FOUND_CODES: [&str; 2] = ["InvalidAMIID.NotFound", "InvalidAMIID.Unavailable"];

/// Provider error codes that mean the credentials are unusable.
const CREDENTIAL_CODES: [&str; 4] = [
    "AuthFailure",
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "ExpiredToken",
];

/// Provider reached through the `aws` executable
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
}

impl AwsCli {
    /// Locate `aws` on PATH; fails with a missing-prerequisite error if absent.
    pub fn new() -> VawsResult<Self> {
        Ok(Self {
            program: ensure_command_exists("aws")?,
        })
    }

    /// Use a specific executable (tests, non-standard installs).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, ctx: &ProviderContext, service: &str, operation: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(service)
            .arg(operation)
            .arg("--region")
            .arg(&ctx.region)
            .arg("--output")
            .arg("json");
        if let Some(profile) = &ctx.profile {
            cmd.arg("--profile").arg(profile);
        }
        cmd
    }

    fn run(&self, mut cmd: Command, operation: &str, stdin: Option<&str>) -> VawsResult<Vec<u8>> {
        debug!(operation, args = ?cmd.get_args().collect::<Vec<_>>(), "calling aws");

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd.spawn()?;
        if let (Some(body), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(body.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        let err = parse_error(operation, &String::from_utf8_lossy(&output.stderr));
        if let VawsError::Provider { code, message, .. } = &err {
            error!(operation, code = code.as_deref().unwrap_or("-"), %message, "AWS request rejected");
        }
        Err(err)
    }

    fn call<T: DeserializeOwned>(&self, cmd: Command, operation: &str) -> VawsResult<T> {
        let stdout = self.run(cmd, operation, None)?;
        serde_json::from_slice(&stdout).map_err(|e| VawsError::ProviderResponse {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }
}

/// Turn `aws` stderr into a typed error.
///
/// The client prints `An error occurred (Code) when calling the Op operation: message`.
pub fn parse_error(operation: &str, stderr: &str) -> VawsError {
    let stderr = stderr.trim();

    if stderr.contains("Unable to locate credentials") {
        return VawsError::Credentials {
            message: stderr.to_string(),
        };
    }

    let code = stderr
        .split_once("An error occurred (")
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(code, _)| code.to_string());
    let message = stderr
        .split_once("operation: ")
        .map(|(_, m)| m.trim().to_string())
        .unwrap_or_else(|| stderr.to_string());

    if code
        .as_deref()
        .is_some_and(|c| CREDENTIAL_CODES.contains(&c))
    {
        return VawsError::Credentials { message };
    }

    VawsError::Provider {
        operation: operation.to_string(),
        code,
        message,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstanceTypes {
    instance_types: Vec<InstanceTypeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceTypeInfo {
    instance_type: String,
    memory_info: MemoryInfo,
}

#[derive(Debug, Deserialize)]
struct MemoryInfo {
    #[serde(rename = "SizeInMiB")]
    size_in_mib: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSecurityGroups {
    security_groups: Vec<GroupId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GroupId {
    group_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcs {
    vpcs: Vec<Vpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Vpc {
    vpc_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    subnets: Vec<Subnet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Subnet {
    subnet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeKeyPairs {
    key_pairs: Vec<KeyPair>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyPair {
    key_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImages {
    images: Vec<serde_json::Value>,
}

impl InstanceCatalog for AwsCli {
    fn describe_instance_types(
        &self,
        ctx: &ProviderContext,
        instance_types: &[&str],
    ) -> VawsResult<Vec<InstanceCatalogEntry>> {
        let mut cmd = self.command(ctx, "ec2", "describe-instance-types");
        cmd.arg("--instance-types").args(instance_types);

        let response: DescribeInstanceTypes = self.call(cmd, "describe-instance-types")?;
        Ok(response
            .instance_types
            .into_iter()
            .map(|t| InstanceCatalogEntry::from_mib(t.instance_type, t.memory_info.size_in_mib))
            .collect())
    }
}

impl SecurityRules for AwsCli {
    fn find_group(
        &self,
        ctx: &ProviderContext,
        vpc_id: &str,
        name: &str,
    ) -> VawsResult<Option<String>> {
        let mut cmd = self.command(ctx, "ec2", "describe-security-groups");
        cmd.arg("--filters")
            .arg(format!("Name=group-name,Values={}", name))
            .arg(format!("Name=vpc-id,Values={}", vpc_id));

        let response: DescribeSecurityGroups = self.call(cmd, "describe-security-groups")?;
        Ok(response.security_groups.into_iter().next().map(|g| g.group_id))
    }

    fn create_group(
        &self,
        ctx: &ProviderContext,
        vpc_id: &str,
        rule: &SecurityRule,
    ) -> VawsResult<String> {
        let mut cmd = self.command(ctx, "ec2", "create-security-group");
        cmd.arg("--group-name")
            .arg(&rule.name)
            .arg("--description")
            .arg(&rule.description)
            .arg("--vpc-id")
            .arg(vpc_id);

        let response: GroupId = self.call(cmd, "create-security-group")?;
        Ok(response.group_id)
    }

    fn authorize_ingress(
        &self,
        ctx: &ProviderContext,
        group_id: &str,
        permission: &IngressPermission,
    ) -> VawsResult<()> {
        let permissions = serde_json::json!([{
            "IpProtocol": permission.protocol.as_str(),
            "FromPort": permission.from_port,
            "ToPort": permission.to_port,
            "IpRanges": [{ "CidrIp": permission.cidr }],
        }]);

        let mut cmd = self.command(ctx, "ec2", "authorize-security-group-ingress");
        cmd.arg("--group-id")
            .arg(group_id)
            .arg("--ip-permissions")
            .arg(permissions.to_string());

        self.run(cmd, "authorize-security-group-ingress", None)?;
        Ok(())
    }
}

impl NetworkInventory for AwsCli {
    fn default_vpc(&self, ctx: &ProviderContext) -> VawsResult<Option<String>> {
        let mut cmd = self.command(ctx, "ec2", "describe-vpcs");
        cmd.arg("--filters").arg("Name=isDefault,Values=true");

        let response: DescribeVpcs = self.call(cmd, "describe-vpcs")?;
        Ok(response.vpcs.into_iter().next().map(|v| v.vpc_id))
    }

    fn subnets(&self, ctx: &ProviderContext, vpc_id: &str) -> VawsResult<Vec<String>> {
        let mut cmd = self.command(ctx, "ec2", "describe-subnets");
        cmd.arg("--filters").arg(format!("Name=vpc-id,Values={}", vpc_id));

        let response: DescribeSubnets = self.call(cmd, "describe-subnets")?;
        Ok(response.subnets.into_iter().map(|s| s.subnet_id).collect())
    }

    fn key_pairs(&self, ctx: &ProviderContext) -> VawsResult<Vec<String>> {
        let cmd = self.command(ctx, "ec2", "describe-key-pairs");
        let response: DescribeKeyPairs = self.call(cmd, "describe-key-pairs")?;
        Ok(response.key_pairs.into_iter().map(|k| k.key_name).collect())
    }

    fn image_exists(&self, ctx: &ProviderContext, image_id: &str) -> VawsResult<bool> {
        let mut cmd = self.command(ctx, "ec2", "describe-images");
        cmd.arg("--image-ids").arg(image_id);

        match self.call::<DescribeImages>(cmd, "describe-images") {
            Ok(response) => Ok(!response.images.is_empty()),
            Err(VawsError::Provider { code: Some(code), .. })
                if IMAGE_NOT_FOUND_CODES.contains(&code.as_str()) =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl ObjectStorage for AwsCli {
    fn put_object(
        &self,
        ctx: &ProviderContext,
        bucket: &str,
        key: &str,
        body: &str,
    ) -> VawsResult<String> {
        let uri = format!("s3://{}/{}", bucket, key);
        let mut cmd = self.command(ctx, "s3", "cp");
        cmd.arg("-").arg(&uri);

        self.run(cmd, "s3 cp", Some(body))?;
        Ok(uri)
    }
}
