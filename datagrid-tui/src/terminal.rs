//! Terminal setup and teardown with panic safety.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use datagrid::metrics::ScrollbarProbe;

/// Owns raw mode and the alternate screen; restores both on drop.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    /// Initialize the terminal for grid rendering.
    pub fn new() -> io::Result<Self> {
        // Restore the terminal before the default hook prints the panic.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }

    /// Get the terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    Ok(())
}

/// Scrollbar probe for a terminal.
///
/// The probe "element" is a snapshot of the terminal width. The grid
/// reserves the rightmost column for its scrollbar, so the content width
/// is one cell narrower.
#[derive(Debug, Default)]
pub struct TerminalProbe;

/// Width reserved for the scrollbar, in cells.
const SCROLLBAR_CELLS: u16 = 1;

impl ScrollbarProbe for TerminalProbe {
    type Element = u16;

    fn create(&mut self) -> u16 {
        terminal::size()
            .map(|(width, _)| width)
            .unwrap_or(80)
            .max(SCROLLBAR_CELLS + 1)
    }

    fn outer_width(&self, element: &u16) -> u16 {
        *element
    }

    fn inner_width(&self, element: &u16) -> u16 {
        element.saturating_sub(SCROLLBAR_CELLS)
    }

    fn destroy(&mut self, _element: u16) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reports_one_cell() {
        let mut probe = TerminalProbe;
        assert_eq!(datagrid::metrics::measure_scrollbar(&mut probe), 1);
    }
}
