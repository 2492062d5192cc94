//! Configure command handlers

use anyhow::Result;

use vaws::application::{ClusterOptions, ConfigureClusterUseCase, ConfigureImageUseCase, ImageOptions};
use vaws::config::Config;
use vaws::infrastructure::AwsCli;

use crate::cli::{ConfigureAmiArgs, ConfigureClusterArgs};
use crate::ui::json::emit;

pub fn cmd_configure_ami(args: ConfigureAmiArgs, config: &Config, json: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let ctx = config.provider_context(args.region.as_deref())?;

    let options = ImageOptions {
        name: args.name,
        code_root: args.code_root,
        output_root: config.resolve_output_dir(args.output.as_deref(), &cwd),
        artifacts: args.artifact,
        instance_type: args.instance_type,
    };

    // The catalog is only consulted when no type was given.
    let aws = match options.instance_type {
        Some(_) => AwsCli::with_program("aws"),
        None => AwsCli::new()?,
    };

    if json {
        let _ = emit(serde_json::json!({
            "event": "start",
            "command": "configure ami",
            "name": options.name,
            "region": ctx.region,
        }));
    }

    let result = ConfigureImageUseCase::new(aws).execute(&ctx, &options)?;

    if json {
        let _ = emit(serde_json::json!({
            "event": "complete",
            "command": "configure ami",
            "output_dir": result.output_dir,
            "spec": result.spec_path,
            "archive": result.archive_path,
            "script": result.script_path,
            "artifacts": result.artifacts.iter().map(|a| &a.original_path).collect::<Vec<_>>(),
            "payload_bytes": result.payload_bytes,
            "instance_type": result.instance_type,
        }));
        return Ok(());
    }

    println!("✓ Image configuration written to {}", result.output_dir.display());
    for artifact in &result.artifacts {
        println!("  artifact: {}", artifact.original_path.display());
    }
    match &result.instance_type {
        Some(instance_type) => println!("  build instance: {}", instance_type),
        None => {
            eprintln!(
                "⚠ No build instance type could be chosen. Set `instance_type` in {} before running `vaws make ami`.",
                result.spec_path.display()
            );
        }
    }
    println!("\nNext: vaws make ami {}", result.spec_path.display());
    Ok(())
}

pub fn cmd_configure_cluster(args: ConfigureClusterArgs, config: &Config, json: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let ctx = config.provider_context(args.region.as_deref())?;

    let mut options =
        ClusterOptions::from_config(args.name, args.image_id, args.bucket, &config.cluster);
    options.output_root = config.resolve_output_dir(args.output.as_deref(), &cwd);
    options.vpc_id = args.vpc_id;
    options.subnet_id = args.subnet_id;
    options.key_name = args.key_name;
    if let Some(t) = args.master_instance_type {
        options.master_instance_type = t;
    }
    if let Some(t) = args.compute_instance_type {
        options.compute_instance_type = t;
    }
    if let Some(n) = args.max_queue_size {
        options.max_queue_size = n;
    }
    if args.no_post_install {
        options.post_install = false;
    }

    if json {
        let _ = emit(serde_json::json!({
            "event": "start",
            "command": "configure cluster",
            "name": options.name,
            "region": ctx.region,
        }));
    }

    let result = ConfigureClusterUseCase::new(AwsCli::new()?).execute(&ctx, &options)?;
    let settings = &result.settings;

    if json {
        let _ = emit(serde_json::json!({
            "event": "complete",
            "command": "configure cluster",
            "config": result.config_path,
            "vpc_id": settings.vpc_id,
            "subnet_id": settings.master_subnet_id,
            "key_name": settings.key_name,
            "security_group_id": settings.security_group_id,
            "post_install": settings.post_install,
        }));
        return Ok(());
    }

    println!("✓ Cluster configuration written to {}", result.config_path.display());
    println!("  vpc: {}", settings.vpc_id);
    println!("  subnet: {}", settings.master_subnet_id);
    println!("  key pair: {}", settings.key_name);
    println!("  security group: {}", settings.security_group_id);
    println!("\nNext: vaws make cluster {}", result.config_path.display());
    Ok(())
}
