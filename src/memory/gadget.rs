/// Branch gadget copied to every probed address.
///
/// ```text
/// jmp target   ; eb 02
/// nop          ; 90
/// nop          ; 90
/// target:
/// nop          ; 90
/// nop          ; 90
/// ret          ; c3
/// ```
///
/// When the `jmp` lands on an address that collides with a real branch of the probed host
/// function under the predictor's indexing function, the two share a branch target buffer
/// entry and the timed execution mispredicts.
pub const BRANCH_GADGET: [u8; 7] = [0xEB, 0x02, 0x90, 0x90, 0x90, 0x90, 0xC3];
