macro_rules! static_assert {
    ($cond:expr, $msg:expr) => {
        const _: () = {
            const fn static_assertion() {
                assert!($cond, $msg);
            }
            static_assertion()
        };
    };
    ($cond:expr) => {
        static_assert!($cond, "Static assertion failed");
    };
}

pub(crate) use static_assert;
