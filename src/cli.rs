use crate::app::dto::{
    EngineOptions, HierarchyRequest, ResolverKind, SearchRequest, SubtypesRequest, TypeResponse,
};
use crate::app::engine::DescriptorEngine;
use crate::server::{http, mcp::DescriptorMcpServer};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Inspect a type/method descriptor index built from a static scan
#[derive(Parser)]
#[command(name = "dixtool", version, about, long_about = None)]
pub struct Cli {
    /// Scan index JSON file
    #[arg(value_name = "SCAN")]
    pub scan: PathBuf,

    /// Additional scan files merged after SCAN before linking
    #[arg(long = "merge", value_name = "FILE")]
    pub merge: Vec<PathBuf>,

    /// Fallback resolution for type names the scan does not declare
    #[arg(long, value_enum, default_value_t = ResolverKind::Jvm)]
    pub resolver: ResolverKind,

    /// Extra package prefix treated as library code (jvm resolver only)
    #[arg(long = "library-prefix", value_name = "PREFIX")]
    pub library_prefixes: Vec<String>,

    /// Drop types that fail to link instead of failing the build
    #[arg(long)]
    pub lenient: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Type, method, field and edge counts plus rejected entries
    Summary,
    /// Every descriptor as JSON
    Dump,
    /// One type with its members and annotations
    Describe {
        #[arg(value_name = "TYPE")]
        name: String,
    },
    /// Whether CANDIDATE is TYPE or one of its superclasses
    Hierarchy {
        #[arg(value_name = "TYPE")]
        type_name: String,
        #[arg(value_name = "CANDIDATE")]
        candidate: String,
    },
    /// Subtypes of a type
    Subtypes {
        #[arg(value_name = "TYPE")]
        name: String,
        /// Include indirect subtypes
        #[arg(long)]
        transitive: bool,
    },
    /// Search scanned type names
    Search {
        pattern: String,
        /// Treat PATTERN as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Types, methods and fields carrying an annotation
    Annotated {
        #[arg(value_name = "ANNOTATION")]
        annotation: String,
    },
    /// Entity mappings read from persistence annotations
    Entities,
    /// Entity types a polymorphic query on ENTITY covers
    Targets {
        #[arg(value_name = "ENTITY")]
        entity: String,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8118)]
        port: u16,
    },
    /// Serve MCP tools over stdio
    Mcp,
}

impl Cli {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            resolver: self.resolver,
            library_prefixes: self.library_prefixes.clone(),
            lenient: self.lenient,
        }
    }

    pub fn scan_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.scan.clone())
            .chain(self.merge.iter().cloned())
            .collect()
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let engine = DescriptorEngine::load_from_json(&cli.scan_paths(), cli.engine_options())
        .with_context(|| format!("Failed to load descriptor index from {}", cli.scan.display()))?;
    let json = cli.json;

    match cli.command {
        Command::Summary => print_summary(&engine, json),
        Command::Dump => print_json(&engine.dump()),
        Command::Describe { name } => {
            let t = engine.describe_type(&name)?;
            if json {
                print_json(&t)
            } else {
                print_type(&t);
                Ok(())
            }
        }
        Command::Hierarchy {
            type_name,
            candidate,
        } => {
            let res = engine.hierarchy(HierarchyRequest {
                type_name,
                candidate,
            })?;
            if json {
                return print_json(&res);
            }
            println!(
                "{}.is_type_or_super_type({}) = {}",
                res.type_name, res.candidate, res.is_type_or_super_type
            );
            println!("assignable: {}", res.is_assignable);
            println!("superclass chain: {}", chain_text(&res.supertype_chain));
            Ok(())
        }
        Command::Subtypes { name, transitive } => {
            let res = engine.subtypes(SubtypesRequest { name, transitive })?;
            if json {
                return print_json(&res);
            }
            let scope = if res.transitive { "all" } else { "direct" };
            println!("{} subtypes of {}: {}", scope, res.name, res.subtypes.len());
            for s in &res.subtypes {
                println!("  [{}] {}", s.kind, s.name);
            }
            Ok(())
        }
        Command::Search {
            pattern,
            regex,
            limit,
        } => {
            let res = engine.search(SearchRequest {
                pattern: pattern.clone(),
                regex,
                limit,
            })?;
            if json {
                return print_json(&res);
            }
            println!("Found {} type(s) matching \"{}\"", res.total_matches, pattern);
            if res.items.len() < res.total_matches {
                println!("Showing first {}", res.items.len());
            }
            for (i, item) in res.items.iter().enumerate() {
                println!("{}. [{}] {}", i + 1, item.kind, item.name);
            }
            Ok(())
        }
        Command::Annotated { annotation } => {
            let res = engine.annotated(&annotation);
            if json {
                return print_json(&res);
            }
            println!("{} element(s) annotated with @{}", res.items.len(), res.annotation);
            for item in &res.items {
                println!("  [{}] {}", item.element_kind, item.element);
            }
            Ok(())
        }
        Command::Entities => {
            let res = engine.entities()?;
            if json {
                return print_json(&res);
            }
            for e in &res.entities {
                println!(
                    "{} -> {} (table {}, root {}, {})",
                    e.entity_name, e.type_name, e.table, e.root, e.strategy
                );
            }
            Ok(())
        }
        Command::Targets { entity } => {
            let res = engine.targets(&entity)?;
            if json {
                return print_json(&res);
            }
            println!("Query on {} covers {} entity type(s):", res.entity, res.targets.len());
            for t in &res.targets {
                println!("  {} ({})", t.entity_name, t.type_name);
            }
            Ok(())
        }
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("Invalid listen address: {host}:{port}"))?;
            http::serve(engine, addr).await
        }
        Command::Mcp => DescriptorMcpServer::new(engine).serve_stdio().await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(engine: &DescriptorEngine, json: bool) -> Result<()> {
    let summary = engine.summary();
    if json {
        return print_json(&summary);
    }
    let h = &summary.health;
    println!("Descriptor Index Summary:");
    println!("  Project root: {}", h.project_root);
    println!("  Resolver:     {}", h.resolver);
    println!(
        "  Types:        {} ({} scanned)",
        h.type_count, h.scanned_type_count
    );
    println!("  Methods:      {}", h.method_count);
    println!("  Fields:       {}", h.field_count);
    println!("  Edges:        {}", h.edge_count);
    println!("  Rejected:     {}", h.rejected_count);
    for r in &summary.rejected {
        println!("    [{}] {}", r.kind, r.message);
    }
    Ok(())
}

fn chain_text(chain: &[String]) -> String {
    if chain.is_empty() {
        "(none)".to_string()
    } else {
        chain.join(" -> ")
    }
}

fn print_type(t: &TypeResponse) {
    println!("{} {} {}", t.modifier_keywords.join(" "), t.kind, t.name);
    if let Some(source) = &t.source {
        println!("  source: {}", source);
    }
    println!("  superclass chain: {}", chain_text(&t.supertype_chain));
    if !t.interfaces.is_empty() {
        println!("  interfaces: {}", t.interfaces.join(", "));
    }
    if let Some(component) = &t.component_type {
        println!("  component: {}", component);
    }
    for a in &t.annotations {
        println!("  @{}", a.name);
    }
    if !t.fields.is_empty() {
        println!("  fields:");
        for f in &t.fields {
            println!("    {} {}: {}", f.modifier_keywords.join(" "), f.name, f.field_type);
        }
    }
    if !t.methods.is_empty() {
        println!("  methods:");
        for m in &t.methods {
            let annotations: Vec<String> =
                m.annotations.iter().map(|a| format!("@{}", a.name)).collect();
            println!(
                "    {} {} {}",
                m.modifier_keywords.join(" "),
                m.signature,
                annotations.join(" ")
            );
        }
    }
}
