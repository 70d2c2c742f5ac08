mod common;

use common::{section, typical_pe_sections};
use rva_resolver::{ResolverConfig, ResolverError, RvaResolver, SectionHeader};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concrete_two_section_scenario() {
    let resolver = RvaResolver::new(vec![
        section(".text", 0x1000, 0x200, 0x400),
        section(".data", 0x2000, 0x100, 0x600),
    ]);

    assert_eq!(resolver.get_file_address(0x1050), 0x450);
    assert_eq!(resolver.get_file_address(0x2050), 0x650);
    assert_eq!(resolver.get_file_address(0x3000), 0);
}

#[test]
fn test_every_address_inside_a_run_translates() {
    let sections = typical_pe_sections();
    let resolver = RvaResolver::new(&sections);

    for header in sections.iter().filter(|s| s.size_of_raw_data > 0) {
        let start = header.virtual_address;
        let end = start + header.size_of_raw_data;
        for rva in (start..end).step_by(0x40).chain([end - 1]) {
            assert_eq!(
                resolver.get_file_address(rva),
                rva - start + header.pointer_to_raw_data,
                "{} at {:#x}",
                header.name(),
                rva
            );
        }
    }
}

#[test]
fn test_run_boundaries() {
    let resolver = RvaResolver::new(typical_pe_sections());

    for run in resolver.runs() {
        let va = run.virtual_address();
        let end = run.virtual_end();
        assert_eq!(resolver.get_file_address(va), run.physical_address());
        assert_eq!(
            resolver.get_file_address(end - 1),
            run.physical_address() + end - va - 1
        );
        // The exclusive end never resolves through this run
        assert_ne!(
            resolver.run_containing(end).map(|r| r.virtual_address()),
            Some(va)
        );
    }
}

#[test]
fn test_bss_is_unresolvable() {
    let resolver = RvaResolver::new(typical_pe_sections());

    assert_eq!(resolver.len(), 4);
    assert_eq!(resolver.get_file_address(0x4000), 0);
    assert_eq!(resolver.get_file_address(0x4100), 0);
    assert!(matches!(
        resolver.resolve(0x4100),
        Err(ResolverError::UnmappedAddress { rva: 0x4100 })
    ));
}

#[test]
fn test_only_empty_sections_never_resolve() {
    let resolver = RvaResolver::new(vec![
        section(".bss", 0, 0, 999),
        section(".tls", 0x1000, 0, 0x400),
        section(".stub", 0xFFFF_0000, 0, 0xFFFF),
    ]);

    assert!(resolver.is_empty());
    for rva in [0, 1, 0x1000, 0x1fff, 0xFFFF_0000, u32::MAX] {
        assert_eq!(resolver.get_file_address(rva), 0);
        assert_eq!(resolver.file_address(rva), None);
    }
}

#[test]
fn test_overlapping_sections_resolve_to_first() {
    let resolver = RvaResolver::new(vec![(0u32, 100u32, 1000u32), (50, 100, 5000)]);

    assert_eq!(resolver.get_file_address(75), 1075);
    assert_ne!(resolver.get_file_address(75), 5025);
    assert_eq!(resolver.get_file_address(100), 5050);
    assert_eq!(resolver.get_file_address(150), 0);
}

#[test]
fn test_overlap_reporting_does_not_change_lookups() {
    rva_resolver::logging::init_tracing();

    let sections = vec![(0x1000u32, 0x800u32, 0x400u32), (0x1400, 0x800, 0x2000)];
    let loud = ResolverConfig {
        report_overlaps: true,
        ..ResolverConfig::default()
    };

    let reported = RvaResolver::with_config(&sections, &loud);
    let silent = RvaResolver::new(&sections);

    assert_eq!(reported, silent);
    assert_eq!(reported.overlapping_runs(), vec![(0, 1)]);
    assert_eq!(reported.get_file_address(0x1500), 0x900);
}

#[test]
fn test_locate_directory_record() {
    // An export directory is 40 bytes; it must sit wholly inside .rdata
    let resolver = RvaResolver::new(typical_pe_sections());

    let range = resolver.resolve_range(0x5100, 40).unwrap();
    assert_eq!(range, 0x1d00..0x1d28);

    let data = vec![0u8; 0x2600];
    assert_eq!(data[range].len(), 40);

    assert!(resolver.file_range(0x55f0, 40).is_none());
}

#[test]
fn test_wrapping_sections_are_accepted() {
    // End overflows u32; the run exists but contains nothing
    let resolver = RvaResolver::new(vec![(0xFFFF_F000u32, 0x2000u32, 0x400u32)]);

    assert_eq!(resolver.len(), 1);
    assert_eq!(resolver.runs()[0].virtual_end(), 0x1000);
    assert_eq!(resolver.get_file_address(0xFFFF_F800), 0);
    assert_eq!(resolver.get_file_address(0x800), 0);
}

#[test]
fn test_batch_matches_single_lookups() {
    let resolver = RvaResolver::new(typical_pe_sections());
    let rvas: Vec<u32> = (0..0x7000).step_by(0x33).collect();

    let batch = resolver.get_file_addresses(&rvas);
    let single: Vec<u32> = rvas.iter().map(|&rva| resolver.get_file_address(rva)).collect();
    assert_eq!(batch, single);
}

#[test]
fn test_shared_across_threads() {
    let resolver = Arc::new(RvaResolver::new(typical_pe_sections()));

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                let rva = 0x1000 + i * 0x100;
                resolver.get_file_address(rva)
            })
        })
        .collect();

    let results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0x400, 0x500, 0x600, 0x700]);
}

#[test]
fn test_descriptor_slices_and_references() {
    let headers: Vec<SectionHeader> = typical_pe_sections();
    let by_ref = RvaResolver::new(headers.iter());
    let owned = RvaResolver::new(headers.clone());
    assert_eq!(by_ref, owned);
}
