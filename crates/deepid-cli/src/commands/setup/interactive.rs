//! Themed dialoguer prompts for the setup wizard.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use std::str::FromStr;

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Pick one of `items` with the arrow keys
pub fn select<T: std::fmt::Display>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    Ok(Select::with_theme(&theme())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Typed input with a default, re-prompting until it parses
pub fn input<T>(prompt: &str, default: T) -> Result<T>
where
    T: Clone + ToString + FromStr,
    T::Err: ToString,
{
    Ok(Input::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact_text()?)
}

/// Hidden input for secrets
pub fn password(prompt: &str) -> Result<String> {
    Ok(Password::with_theme(&theme())
        .with_prompt(prompt)
        .validate_with(|key: &String| {
            if key.trim().len() < 8 {
                Err("API key seems too short")
            } else {
                Ok(())
            }
        })
        .interact()?)
}
