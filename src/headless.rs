//! One-shot commands that print backend replies instead of opening the window.

use crate::backend::BackendClient;
use crate::dispatch;
use std::error::Error;
use std::io::Write;

pub async fn ask(
    client: &BackendClient,
    prompt: String,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let entry = dispatch::ask_basic_llm(client, prompt).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
    Ok(())
}

pub async fn solve(
    client: &BackendClient,
    problem: String,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let init = client.init_workflow(&problem).await?;
    let workflow_id = init.workflow_id()?;
    writeln!(out, "Workflow initialized with ID: {workflow_id}")?;

    let step = client.step_workflow(workflow_id).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&step)?)?;
    Ok(())
}
