use crate::constants::STACK_SIZE;

/// # Call stack
/// Stores return addresses when subroutines are called.
/// `sp` is the number of frames in use, so `stack[sp - 1]` is the most recent return address.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack {
    pub frames: [u16; STACK_SIZE],
    pub sp: u8,
}

impl Stack {
    /// Pushes a return address; `None` if all 16 levels are in use.
    pub fn push(&mut self, address: u16) -> Option<()> {
        let slot = self.frames.get_mut(self.sp as usize)?;
        *slot = address;
        self.sp += 1;
        Some(())
    }

    /// Pops the most recent return address; `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<u16> {
        let sp = self.sp.checked_sub(1)?;
        self.sp = sp;
        Some(self.frames[sp as usize])
    }

    pub fn depth(&self) -> usize {
        self.sp as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_pop() {
        let mut stack = Stack::default();
        stack.push(0x202).unwrap();
        stack.push(0x304).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(0x304));
        assert_eq!(stack.pop(), Some(0x202));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_empty() {
        let mut stack = Stack::default();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.sp, 0);
    }

    #[test]
    fn test_push_full() {
        let mut stack = Stack::default();
        for address in 0..STACK_SIZE as u16 {
            stack.push(address).unwrap();
        }
        let before = stack;
        assert_eq!(stack.push(0xFFF), None);
        assert_eq!(stack, before);
    }
}
