// Copyright 2025 The Axvisor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! riscv_vtrap - Host IRQ domains and SBI hypercall dispatch for RISC-V hypervisors.
//!
//! This crate implements the two namespaces a trap-and-emulate RISC-V hypervisor
//! has to keep collision-free while every physical core may use them at once:
//!
//! - the **host IRQ number space**, partitioned into [`IrqDomain`]s by an
//!   [`IrqDomainManager`], which translates controller-local hardware IRQ
//!   indices into host IRQ numbers and creates or disposes mappings on demand
//!   through a [`HostIrqHal`];
//! - the **SBI extension ID space**, partitioned across [`SbiExtension`]s held
//!   by an [`SbiExtensionRegistry`], whose [`ecall`](SbiExtensionRegistry::ecall)
//!   routine decodes a trapped guest `ecall`, dispatches it and writes the
//!   result back through an [`SbiTrapFrame`].
//!
//! # Features
//!
//! - Interrupt-safe reader/writer locking of the domain registry ([`IrqSafeRwLock`])
//! - On-demand, idempotent hwirq to hirq mapping
//! - Best-effort, total teardown of removed domains
//! - Guest-visible SBI v0.3 identity (implementation ID 2) through [`BaseExtension`]

#![no_std]

#[macro_use]
extern crate alloc;

#[macro_use]
extern crate log;

// Core modules
mod exit; // Ecall outcome and guest trap descriptor
mod hal; // Host interrupt services consumed by the domain layer
mod irqdomain; // Host IRQ domains and their manager
mod lock; // Interrupt-safe reader/writer lock
mod regs; // Guest register file access for the dispatcher
mod sbi; // SBI extension registry and ecall dispatch

// Public API exports
pub use exit::{EcallExit, GuestTrap};
pub use hal::{HostIrqHal, HostIrqInfo};
pub use irqdomain::*;
pub use lock::{IrqSafeReadGuard, IrqSafeRwLock, IrqSafeWriteGuard};
pub use regs::{GprIndex, SbiTrapFrame};
pub use sbi::*;
