use crate::graph::{
    amplify::Amplify,
    mix::{Mix, Sum},
    modulate::Modulate,
    node::{Modulatable, Processor, Signal},
    through::Through,
};

pub trait SignalExt: Signal + Sized {
    fn amplify<M: Signal>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<P: Processor>(self, processor: P) -> Through<Self, P> {
        Through::new(self, processor)
    }

    fn modulate<M: Signal>(self, modulator: M, param: Self::Param) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, modulator, param)
    }

    fn mix<B: Signal>(self, source: B, balance: f32) -> Mix<Self, B> {
        Mix::new(self, source, balance)
    }

    fn sum<B: Signal>(self, source: B) -> Sum<Self, B> {
        Sum::new(self, source)
    }

    fn boxed(self) -> Box<dyn Signal>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Signal> SignalExt for T {}

pub trait ProcessorExt: Processor + Sized {
    fn modulate<M: Signal>(self, modulator: M, param: Self::Param) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, modulator, param)
    }

    fn boxed(self) -> Box<dyn Processor>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Processor> ProcessorExt for T {}
