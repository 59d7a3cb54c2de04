//! PikkuOS Kernel Entry Point

#![no_std]
#![no_main]

use bootloader::{entry_point, BootInfo};
use core::panic::PanicInfo;
use pikku_hal::{Color, Console};
use pikku_kernel::arch::x86_64::{self, VgaConsole, X86Cpu};
use pikku_kernel::boot::{self, Status};
use pikku_kernel::config::{BootConfig, OS_NAME};
use pikku_kernel::terminal::Terminal;
use pikku_kernel::{println, serial_println};

entry_point!(kernel_main);

static CPU: X86Cpu = X86Cpu;

/// Kernel entry point.
///
/// Called by the bootloader with interrupts disabled.
fn kernel_main(_boot_info: &'static BootInfo) -> ! {
    let config = BootConfig::DEFAULT;
    pikku_kernel::init(&config);

    let mut console = VgaConsole;
    console.clear();
    boot::banner::print_banner(&mut console);
    boot::log(&mut console, Status::Ok, "Serial port initialized");

    pikku_kernel::selftest::run_all();
    boot::log(&mut console, Status::Ok, "Self checks passed");

    let dispatcher = match x86_64::interrupts::init(&config, &CPU) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            boot::log(&mut console, Status::Fail, "Interrupt setup failed");
            panic!("interrupt setup failed: {}", err);
        }
    };
    boot::log(&mut console, Status::Ok, "Interrupt controllers remapped");
    boot::log_detail(&mut console, "Keyboard enabled, all other lines masked");
    boot::log(&mut console, Status::Ok, "Vector table loaded");
    boot::log(&mut console, Status::Info, "Type 'help' for commands");

    log::info!("{} ready", OS_NAME);
    let mut terminal = Terminal::new(console, dispatcher.input(), &CPU, config.line_length);
    terminal.run()
}

/// Panic handler.
///
/// Called when the kernel encounters an unrecoverable error.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("KERNEL PANIC: {}", info);

    x86_64::vga::set_color(Color::LightRed, Color::Black);
    println!("\n\n!!! KERNEL PANIC !!!");
    x86_64::vga::set_color(Color::White, Color::Black);
    println!("{}", info);

    x86_64::halt_loop()
}
